//! Readiness coordination: request topic creation, poll cluster metadata
//! until every expected topic is visible, then poll the schema registry until
//! it reports healthy.
//!
//! The polling loops share one attempt counter and one geometric delay for
//! the whole topic phase; newly created topics propagate to metadata at
//! unpredictable speed, and a single escalating backoff avoids hammering the
//! broker while keeping the total wait bounded by the attempt budget. The
//! registry phase starts over with a fresh counter and delay.

use crate::config::RetryConfig;
use crate::kafka::admin::AdminOps;
use crate::kafka::topics::TopicSet;
use crate::retry::Backoff;
use crate::{Error, Result};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

pub struct ReadinessCoordinator<A> {
    admin: A,
    topics: TopicSet,
    retry: RetryConfig,
}

impl<A: AdminOps> ReadinessCoordinator<A> {
    pub fn new(admin: A, topics: TopicSet, retry: RetryConfig) -> Self {
        Self {
            admin,
            topics,
            retry,
        }
    }

    /// Drives the cluster to readiness, waiting as long as the retry budget
    /// allows.
    ///
    /// Returns once every topic is visible in cluster metadata and the schema
    /// registry has answered healthy. Readiness is a hard precondition for
    /// the caller, so exhausting either poll is an error.
    pub async fn init(&self) -> Result<()> {
        self.init_with_shutdown(std::future::pending()).await
    }

    /// Same as [`init`](Self::init), but aborts with [`Error::Interrupted`]
    /// if `shutdown` resolves while a wait is in progress.
    #[instrument(skip_all)]
    pub async fn init_with_shutdown<S>(&self, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        self.admin.create_topics(&self.topics).await?;
        self.wait_for_topics(&mut shutdown).await?;
        self.wait_for_registry(&mut shutdown).await?;

        let names: Vec<&str> = self.topics.names().collect();
        info!(topics = ?names, "Topics are ready for operation");
        Ok(())
    }

    async fn wait_for_topics<S>(&self, shutdown: &mut Pin<&mut S>) -> Result<()>
    where
        S: Future<Output = ()>,
    {
        let max_attempts = self.retry.max_attempts;
        let mut backoff = Backoff::new(&self.retry);
        let mut attempt: u32 = 1;
        let mut snapshot = self.admin.list_topics().await?;

        // One counter and one delay span all topics: later topics inherit
        // the budget already consumed by earlier ones
        for spec in self.topics.specs() {
            while !snapshot.contains(&spec.name) {
                if attempt > max_attempts {
                    warn!(
                        topic = %spec.name,
                        max_attempts,
                        "Topic did not appear within the attempt budget"
                    );
                    return Err(Error::retry_exhausted("topic availability", max_attempts));
                }
                debug!(topic = %spec.name, attempt, "Topic not visible yet");
                attempt += 1;
                self.wait(backoff.next_delay(), shutdown).await?;
                snapshot = self.admin.list_topics().await?;
            }
            debug!(topic = %spec.name, "Topic is available");
        }

        info!(topics = self.topics.len(), "All topics are available");
        Ok(())
    }

    async fn wait_for_registry<S>(&self, shutdown: &mut Pin<&mut S>) -> Result<()>
    where
        S: Future<Output = ()>,
    {
        let max_attempts = self.retry.max_attempts;
        let mut backoff = Backoff::new(&self.retry);
        let mut attempt: u32 = 1;

        while !self.admin.probe_schema_registry().await.is_up() {
            if attempt > max_attempts {
                warn!(
                    max_attempts,
                    "Schema registry did not come up within the attempt budget"
                );
                return Err(Error::retry_exhausted(
                    "schema registry availability",
                    max_attempts,
                ));
            }
            debug!(attempt, "Schema registry is not available yet");
            attempt += 1;
            self.wait(backoff.next_delay(), shutdown).await?;
        }

        info!("Schema registry is available");
        Ok(())
    }

    async fn wait<S>(&self, delay: Duration, shutdown: &mut Pin<&mut S>) -> Result<()>
    where
        S: Future<Output = ()>,
    {
        debug!(
            delay_ms = delay.as_millis() as u64,
            "Waiting before next readiness check"
        );
        tokio::select! {
            _ = tokio::time::sleep(delay) => Ok(()),
            _ = shutdown.as_mut() => {
                warn!("Shutdown requested while waiting for cluster readiness");
                Err(Error::Interrupted)
            }
        }
    }
}
