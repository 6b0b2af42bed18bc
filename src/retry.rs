//! Retry primitives for cluster-readiness operations.
//!
//! [`RetryPolicy`] owns the attempt budget: a failed operation is re-invoked
//! immediately, and exhausting the budget surfaces
//! [`Error::RetryExhausted`](crate::Error::RetryExhausted) wrapping the last
//! cause. It is deliberately not time-aware; delay between polls is a
//! separate concern owned by [`Backoff`], which the readiness loops drive so
//! that waiting time accumulates across the whole run rather than per call.

use crate::config::RetryConfig;
use crate::Result;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Attempt budget shared by all retried admin operations.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl RetryPolicy {
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
        }
    }

    /// Runs `op` until it succeeds or the attempt budget is consumed.
    ///
    /// The closure receives the 1-based attempt number (the first call counts
    /// as attempt 1). Failed attempts are re-invoked immediately; callers
    /// that need spacing between attempts layer their own delay around this.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RetryExhausted`](crate::Error::RetryExhausted) naming
    /// `operation` and wrapping the failure observed on the final attempt.
    pub async fn execute<T, F, Fut>(&self, operation: &'static str, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= self.max_attempts => {
                    return Err(e.into_retry_exhausted(operation, self.max_attempts));
                }
                Err(e) => {
                    warn!(operation, attempt, error = %e, "Attempt failed, retrying");
                    attempt += 1;
                }
            }
        }
    }
}

/// Geometric delay sequence for the readiness polling loops.
///
/// Each call to [`next_delay`](Backoff::next_delay) yields the current delay
/// and multiplies it for the next call. Growth is uncapped; total waiting
/// time is bounded by the caller's attempt budget, not by this type.
#[derive(Debug, Clone)]
pub struct Backoff {
    delay: Duration,
    multiplier: f64,
}

impl Backoff {
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            delay: Duration::from_millis(config.initial_delay_ms),
            multiplier: config.multiplier,
        }
    }

    /// Returns the delay to wait now and advances the sequence.
    pub fn next_delay(&mut self) -> Duration {
        let current = self.delay;
        self.delay = self.delay.mul_f64(self.multiplier);
        current
    }
}
