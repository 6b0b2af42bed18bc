//! Admin façade over the cluster: topic creation, metadata listing, and the
//! schema registry health probe.
//!
//! Broker-facing calls are wrapped by the [`RetryPolicy`] so transient
//! transport failures are absorbed up to the attempt budget. The registry
//! probe is different: it is a single bounded-time check that always returns
//! a status, and the readiness loops decide how often to repeat it.

use crate::config::{KafkaConfig, RegistryConfig, RetryConfig};
use crate::kafka::topics::{TopicSet, TopicSnapshot};
use crate::retry::RetryPolicy;
use crate::{Error, Result};
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication, TopicResult};
use rdkafka::client::DefaultClientContext;
use rdkafka::error::KafkaError;
use rdkafka::types::RDKafkaErrorCode;
use rdkafka::ClientConfig;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const METADATA_TIMEOUT: Duration = Duration::from_secs(5);
const CREATE_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of one schema registry health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Up,
    Down,
}

impl HealthStatus {
    pub fn is_up(self) -> bool {
        matches!(self, HealthStatus::Up)
    }
}

/// Cluster operations the readiness coordinator depends on.
///
/// [`ClusterAdmin`] is the production implementation; tests substitute fakes
/// that script metadata convergence without a broker.
pub trait AdminOps {
    /// Issues one creation request covering every topic in `topics`.
    ///
    /// A topic that already exists counts as success, so repeating the call
    /// is safe.
    fn create_topics(&self, topics: &TopicSet) -> impl Future<Output = Result<()>> + Send;

    /// Fetches a fresh snapshot of the topic names known to the cluster.
    ///
    /// An unreachable broker surfaces as an error after the retry budget is
    /// spent, never as an empty snapshot.
    fn list_topics(&self) -> impl Future<Output = Result<TopicSnapshot>> + Send;

    /// Probes the schema registry once.
    ///
    /// Transport failures, timeouts, and non-2xx statuses all map to
    /// [`HealthStatus::Down`]; this call is total and never errors.
    fn probe_schema_registry(&self) -> impl Future<Output = HealthStatus> + Send;
}

/// Production admin client backed by the broker admin protocol and an HTTP
/// client for the registry probe.
pub struct ClusterAdmin {
    admin: AdminClient<DefaultClientContext>,
    http: reqwest::Client,
    registry_url: String,
    retry: RetryPolicy,
}

impl ClusterAdmin {
    pub fn new(
        kafka: &KafkaConfig,
        registry: &RegistryConfig,
        retry: &RetryConfig,
    ) -> Result<Self> {
        let admin: AdminClient<_> = ClientConfig::new()
            .set("bootstrap.servers", kafka.brokers())
            .set("client.id", "kafka-init-admin")
            .create()
            .map_err(Error::Kafka)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(registry.probe_timeout_ms))
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            admin,
            http,
            registry_url: registry.url.clone(),
            retry: RetryPolicy::new(retry),
        })
    }
}

impl AdminOps for ClusterAdmin {
    #[instrument(skip(self, topics), fields(topics = topics.len()))]
    async fn create_topics(&self, topics: &TopicSet) -> Result<()> {
        let new_topics: Vec<NewTopic> = topics
            .specs()
            .iter()
            .map(|spec| {
                NewTopic::new(
                    &spec.name,
                    spec.partitions,
                    TopicReplication::Fixed(spec.replication_factor),
                )
            })
            .collect();
        let opts = AdminOptions::new().operation_timeout(Some(CREATE_TIMEOUT));
        let count = topics.len();

        self.retry
            .execute("creating topics", |attempt| {
                let new_topics = &new_topics;
                let opts = &opts;
                async move {
                    info!(attempt, count, "Creating topics");
                    let results = self
                        .admin
                        .create_topics(new_topics, opts)
                        .await
                        .map_err(Error::Kafka)?;
                    check_create_results(results)
                }
            })
            .await
    }

    #[instrument(skip(self))]
    async fn list_topics(&self) -> Result<TopicSnapshot> {
        self.retry
            .execute("reading topics", |attempt| async move {
                debug!(attempt, "Reading topics from cluster metadata");
                let metadata = self
                    .admin
                    .inner()
                    .fetch_metadata(None, METADATA_TIMEOUT)
                    .map_err(Error::Kafka)?;
                let snapshot: TopicSnapshot = metadata
                    .topics()
                    .iter()
                    .inspect(|topic| debug!(topic = %topic.name(), "Listed topic"))
                    .map(|topic| topic.name().to_string())
                    .collect();
                debug!(topics = snapshot.len(), "Cluster metadata fetched");
                Ok(snapshot)
            })
            .await
    }

    async fn probe_schema_registry(&self) -> HealthStatus {
        match self.http.get(&self.registry_url).send().await {
            Ok(response) if response.status().is_success() => HealthStatus::Up,
            Ok(response) => {
                debug!(
                    status = %response.status(),
                    "Schema registry responded with non-success status"
                );
                HealthStatus::Down
            }
            Err(e) => {
                debug!(error = %e, "Schema registry probe failed");
                HealthStatus::Down
            }
        }
    }
}

fn check_create_results(results: Vec<TopicResult>) -> Result<()> {
    for result in results {
        match result {
            Ok(topic) => {
                info!("Created topic '{}'", topic);
            }
            Err((topic, RDKafkaErrorCode::TopicAlreadyExists)) => {
                info!("Topic '{}' already exists", topic);
            }
            Err((topic, code)) => {
                warn!("Failed to create topic '{}': {}", topic, code);
                return Err(Error::Kafka(KafkaError::AdminOp(code)));
            }
        }
    }
    Ok(())
}
