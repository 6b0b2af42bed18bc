//! Asynchronous message publisher with per-message completion handles.
//!
//! `send` never waits for the broker: it enqueues the record and returns a
//! [`DeliveryHandle`] the caller may await (or drop). Either way exactly one
//! completion is observed per message, and it is logged with its delivery
//! metadata when it arrives.

use crate::config::{KafkaConfig, ProducerConfig};
use crate::{Error, Result};
use rdkafka::error::{KafkaError, KafkaResult};
use rdkafka::message::ToBytes;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::ClientConfig;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, error, info};

const CLOSE_TIMEOUT: Duration = Duration::from_secs(30);

/// Final status of one message, delivered off the sending task.
#[derive(Debug)]
pub enum DeliveryOutcome {
    Delivered {
        topic: String,
        partition: i32,
        offset: i64,
        /// Producer-side record timestamp, milliseconds since the epoch
        timestamp_ms: i64,
    },
    Failed {
        error: KafkaError,
    },
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }
}

/// Awaitable completion for a single `send`.
///
/// Dropping the handle is fine; the outcome is still logged when the broker
/// responds.
pub struct DeliveryHandle {
    topic: String,
    rx: oneshot::Receiver<DeliveryOutcome>,
}

impl DeliveryHandle {
    fn ready(topic: String, outcome: DeliveryOutcome) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(outcome);
        Self { topic, rx }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Waits for the broker acknowledgment for this message.
    pub async fn outcome(self) -> DeliveryOutcome {
        self.rx.await.unwrap_or(DeliveryOutcome::Failed {
            error: KafkaError::Canceled,
        })
    }
}

pub struct KafkaPublisher {
    producer: FutureProducer,
    closed: AtomicBool,
}

impl KafkaPublisher {
    pub fn new(kafka: &KafkaConfig, config: &ProducerConfig) -> Result<Self> {
        let batch_size = config.batch_size * config.batch_size_boost_factor;
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", kafka.brokers())
            .set("batch.size", batch_size.to_string())
            .set("linger.ms", config.linger_ms.to_string())
            .set("compression.type", &config.compression_type)
            .set("acks", &config.acks)
            .set("request.timeout.ms", config.request_timeout_ms.to_string())
            .set("retries", config.retry_count.to_string())
            .create()
            .map_err(Error::Kafka)?;

        Ok(Self {
            producer,
            closed: AtomicBool::new(false),
        })
    }

    /// Enqueues one message and returns without waiting for acknowledgment.
    ///
    /// Enqueue rejection (for example a full local queue) is reported through
    /// the returned handle like any other failure, so the caller sees exactly
    /// one outcome per send either way.
    pub fn send<K, P>(&self, topic: &str, key: &K, payload: &P) -> DeliveryHandle
    where
        K: ToBytes + ?Sized,
        P: ToBytes + ?Sized,
    {
        let timestamp_ms = chrono::Utc::now().timestamp_millis();
        debug!(topic, "Sending message");

        let record = FutureRecord::to(topic)
            .key(key)
            .payload(payload)
            .timestamp(timestamp_ms);

        match self.producer.send_result(record) {
            Ok(delivery) => {
                // The delivery future resolves to the broker result, or to a
                // cancellation if the producer is torn down before the
                // delivery callback fires
                let completion = async move {
                    match delivery.await {
                        Ok(result) => result.map_err(|(e, _message)| e),
                        Err(_) => Err(KafkaError::Canceled),
                    }
                };
                Self::spawn_completion(topic.to_string(), timestamp_ms, completion)
            }
            Err((e, _record)) => {
                error!(topic, error = %e, "Failed to enqueue message");
                DeliveryHandle::ready(topic.to_string(), DeliveryOutcome::Failed { error: e })
            }
        }
    }

    /// Flushes outstanding messages and releases the transport.
    ///
    /// Safe to call more than once; only the first call flushes. Messages
    /// sent after the first close are not covered by it; sequencing the last
    /// send before the close is the caller's job.
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            debug!("Kafka producer already closed");
            return Ok(());
        }
        info!("Closing kafka producer");
        self.producer.flush(CLOSE_TIMEOUT).map_err(Error::Kafka)?;
        Ok(())
    }

    fn spawn_completion<F>(topic: String, timestamp_ms: i64, delivery: F) -> DeliveryHandle
    where
        F: Future<Output = KafkaResult<(i32, i64)>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let handle_topic = topic.clone();
        tokio::spawn(async move {
            let outcome = match delivery.await {
                Ok((partition, offset)) => {
                    debug!(
                        topic = %topic,
                        partition,
                        offset,
                        timestamp_ms,
                        "Message delivered"
                    );
                    DeliveryOutcome::Delivered {
                        topic,
                        partition,
                        offset,
                        timestamp_ms,
                    }
                }
                Err(e) => {
                    error!(topic = %topic, error = %e, "Message delivery failed");
                    DeliveryOutcome::Failed { error: e }
                }
            };
            // Caller may have dropped the handle, which is fine
            let _ = tx.send(outcome);
        });
        DeliveryHandle {
            topic: handle_topic,
            rx,
        }
    }
}
