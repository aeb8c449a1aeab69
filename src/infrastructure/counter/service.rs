//! Counter store trait and error types.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CounterError {
    #[error("Counter store connection error: {0}")]
    ConnectionError(String),
    #[error("Counter store operation error: {0}")]
    OperationError(String),
}

pub type CounterResult<T> = Result<T, CounterError>;

/// Shared integer counters with per-key TTL.
///
/// The three primitives mirror Redis `INCR`, `EXPIRE` and `TTL`, which is all a
/// fixed-window limiter needs. `incr` must be atomic across every process
/// sharing the store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Increments the counter, creating it at 1 if absent or expired.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError`] if the backend fails.
    async fn incr(&self, key: &str) -> CounterResult<u64>;

    /// Sets the counter to expire `ttl` from now.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError`] if the backend fails.
    async fn expire(&self, key: &str, ttl: Duration) -> CounterResult<()>;

    /// Remaining lifetime of the counter; `None` if absent or without expiry.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError`] if the backend fails.
    async fn ttl(&self, key: &str) -> CounterResult<Option<Duration>>;

    async fn health_check(&self) -> bool;
}
