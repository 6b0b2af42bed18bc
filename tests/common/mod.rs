use kafka_init::config::{Config, KafkaConfig, ProducerConfig, RegistryConfig, RetryConfig};
use std::env;

/// Get test configuration from environment variables
pub fn get_test_config() -> Config {
    // Use TEST_ prefix for test environment variables
    let kafka = KafkaConfig {
        bootstrap_servers: env::var("TEST_KAFKA_BROKERS")
            .unwrap_or_else(|_| "localhost:9092".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .collect(),
        topic_names: vec![format!("test_topic_{}", std::process::id())],
        num_partitions: 1,
        replication_factor: 1,
    };

    let registry = RegistryConfig {
        url: env::var("TEST_SCHEMA_REGISTRY_URL")
            .unwrap_or_else(|_| "http://localhost:8081".to_string()),
        probe_timeout_ms: 2000,
    };

    let retry = RetryConfig {
        max_attempts: 10,
        initial_delay_ms: 100, // Fast polling for tests
        multiplier: 1.5,
    };

    let producer = ProducerConfig {
        batch_size: 1, // Small batches for tests
        batch_size_boost_factor: 1,
        linger_ms: 0, // Immediate sending for tests
        compression_type: "none".to_string(),
        acks: "all".to_string(),
        request_timeout_ms: 10_000,
        retry_count: 1,
    };

    Config {
        kafka,
        registry,
        retry,
        producer,
    }
}
