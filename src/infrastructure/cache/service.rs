//! Record cache trait, cached value and error types.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::domain::entities::ShortCodeRecord;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
    #[error("Cache entry could not be decoded: {0}")]
    DecodeError(String),
    #[error("Cache call timed out after {0:?}")]
    Timeout(Duration),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// The access-control-relevant part of a record.
///
/// A cache hit carries everything needed to enforce deletion, expiry and the
/// password gate, so a hit is checked exactly like a store read. The record
/// id ties the entry to one record: once that record is deleted, the entry
/// stops resolving even if the code has been reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedRecord {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub expiry_date: Option<DateTime<Utc>>,
    pub password_hash: Option<String>,
    pub is_deleted: bool,
}

impl CachedRecord {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date.is_some_and(|expiry| now >= expiry)
    }
}

impl From<&ShortCodeRecord> for CachedRecord {
    fn from(record: &ShortCodeRecord) -> Self {
        Self {
            id: record.id,
            short_code: record.short_code.clone(),
            original_url: record.original_url.clone(),
            expiry_date: record.expiry_date,
            password_hash: record.password_hash.clone(),
            is_deleted: record.is_deleted,
        }
    }
}

/// Shared key-value cache in front of record lookups.
///
/// Unlike the store, cache failures are reported to the caller, which decides
/// how to degrade (the redirect path treats any error as a miss).
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed, JSON values with TTL
/// - [`crate::infrastructure::cache::MemoryCache`] - process-local, for tests and local runs
/// - [`crate::infrastructure::cache::NullCache`] - always misses
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordCache: Send + Sync {
    /// Retrieves the cached record for a short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))` on cache hit
    /// - `Ok(None)` on cache miss
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend fails or the entry cannot be decoded.
    async fn get(&self, short_code: &str) -> CacheResult<Option<CachedRecord>>;

    /// Stores a record under its short code for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend fails.
    async fn set(&self, record: &CachedRecord, ttl: Duration) -> CacheResult<()>;

    /// Removes the entry for a short code, if any.
    ///
    /// Used when a record is deleted or its expiry changes.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend fails.
    async fn invalidate(&self, short_code: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
