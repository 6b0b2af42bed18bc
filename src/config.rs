use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub kafka: KafkaConfig,
    pub registry: RegistryConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub producer: ProducerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KafkaConfig {
    pub bootstrap_servers: Vec<String>,
    pub topic_names: Vec<String>,
    #[serde(default = "default_num_partitions")]
    pub num_partitions: i32,
    #[serde(default = "default_replication_factor")]
    pub replication_factor: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistryConfig {
    pub url: String,
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProducerConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_batch_size_boost_factor")]
    pub batch_size_boost_factor: usize,
    #[serde(default = "default_linger_ms")]
    pub linger_ms: u32,
    #[serde(default = "default_compression_type")]
    pub compression_type: String,
    #[serde(default = "default_acks")]
    pub acks: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("KAFKA_INIT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.kafka.bootstrap_servers.is_empty() {
            return Err(Error::Config(
                "kafka.bootstrap_servers must not be empty".to_string(),
            ));
        }
        if self.kafka.topic_names.iter().all(|n| n.trim().is_empty()) {
            return Err(Error::Config(
                "kafka.topic_names must contain at least one topic".to_string(),
            ));
        }
        if self.kafka.num_partitions < 1 {
            return Err(Error::Config(
                "kafka.num_partitions must be at least 1".to_string(),
            ));
        }
        if self.kafka.replication_factor < 1 {
            return Err(Error::Config(
                "kafka.replication_factor must be at least 1".to_string(),
            ));
        }
        if self.registry.url.trim().is_empty() {
            return Err(Error::Config("registry.url must not be empty".to_string()));
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::Config(
                "retry.max_attempts must be greater than zero".to_string(),
            ));
        }
        if !self.retry.multiplier.is_finite() || self.retry.multiplier < 1.0 {
            return Err(Error::Config(
                "retry.multiplier must be at least 1.0".to_string(),
            ));
        }
        Ok(())
    }
}

impl KafkaConfig {
    pub fn brokers(&self) -> String {
        self.bootstrap_servers.join(",")
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            multiplier: default_multiplier(),
        }
    }
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            batch_size_boost_factor: default_batch_size_boost_factor(),
            linger_ms: default_linger_ms(),
            compression_type: default_compression_type(),
            acks: default_acks(),
            request_timeout_ms: default_request_timeout_ms(),
            retry_count: default_retry_count(),
        }
    }
}

fn default_num_partitions() -> i32 {
    3
}

fn default_replication_factor() -> i32 {
    3
}

fn default_probe_timeout_ms() -> u64 {
    5000
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_multiplier() -> f64 {
    2.0
}

fn default_batch_size() -> usize {
    16384
}

fn default_batch_size_boost_factor() -> usize {
    100
}

fn default_linger_ms() -> u32 {
    5
}

fn default_compression_type() -> String {
    "snappy".to_string()
}

fn default_acks() -> String {
    "all".to_string()
}

fn default_request_timeout_ms() -> u64 {
    60_000
}

fn default_retry_count() -> u32 {
    5
}
