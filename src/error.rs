//! Error types and result handling for kafka-init.
//!
//! This module defines the main error type [`Error`] and a convenience
//! [`Result`] type alias used throughout the crate.
//!
//! # Example
//!
//! ```rust
//! use kafka_init::{Error, Result};
//!
//! fn load_settings() -> Result<()> {
//!     // Simulating a configuration error
//!     Err(Error::Config("kafka.topic_names must not be empty".to_string()))
//! }
//!
//! match load_settings() {
//!     Ok(()) => println!("Loaded"),
//!     Err(Error::Config(msg)) => eprintln!("Configuration error: {}", msg),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use thiserror::Error;

/// The main error type for kafka-init operations.
///
/// This enum represents all possible errors that can occur while bootstrapping
/// cluster readiness, from configuration issues to exhausted retry budgets.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error, typically from an invalid or incomplete config
    /// file or environment override.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Kafka client, admin, or producer error.
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    /// HTTP client error. Only raised when building the registry client;
    /// the health probe itself maps transport failures to `Down` instead.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// A retried or polled operation consumed its whole attempt budget
    /// without succeeding. Fatal to startup.
    ///
    /// `source` carries the failure observed on the final attempt when there
    /// was one; the readiness polls leave it empty, since every poll there
    /// succeeds and the condition simply never became true.
    #[error("Reached maximum number of retries ({attempts}) for {operation}")]
    RetryExhausted {
        /// Human-readable name of the operation that was retried
        operation: &'static str,
        /// The attempt budget that was consumed
        attempts: u32,
        /// The failure observed on the final attempt, if any
        #[source]
        source: Option<Box<Error>>,
    },

    /// A readiness wait was interrupted by the shutdown future.
    ///
    /// Readiness is a hard precondition for startup, so an interrupted wait
    /// aborts the bootstrap rather than being retried.
    #[error("Interrupted while waiting for cluster readiness")]
    Interrupted,
}

impl Error {
    /// Wraps this error as the final cause of an exhausted retry budget.
    pub(crate) fn into_retry_exhausted(self, operation: &'static str, attempts: u32) -> Error {
        Error::RetryExhausted {
            operation,
            attempts,
            source: Some(Box::new(self)),
        }
    }

    /// Builds an exhaustion error for a poll whose condition never became
    /// true, where no individual attempt failed.
    pub(crate) fn retry_exhausted(operation: &'static str, attempts: u32) -> Error {
        Error::RetryExhausted {
            operation,
            attempts,
            source: None,
        }
    }
}

/// A convenient Result type alias for kafka-init operations.
///
/// This is equivalent to `std::result::Result<T, kafka_init::Error>`.
pub type Result<T> = std::result::Result<T, Error>;
