//! Per-call timeout for any record cache.

use super::service::{CacheError, CacheResult, CachedRecord, RecordCache};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// Bounds every call of the wrapped cache; an elapsed call becomes
/// [`CacheError::Timeout`] and the cache is reported unhealthy.
pub struct TimeoutCache<C> {
    inner: C,
    timeout: Duration,
}

impl<C: RecordCache> TimeoutCache<C> {
    pub fn new(inner: C, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T>(&self, call: impl Future<Output = CacheResult<T>> + Send) -> CacheResult<T> {
        tokio::time::timeout(self.timeout, call)
            .await
            .unwrap_or(Err(CacheError::Timeout(self.timeout)))
    }
}

#[async_trait]
impl<C: RecordCache> RecordCache for TimeoutCache<C> {
    async fn get(&self, short_code: &str) -> CacheResult<Option<CachedRecord>> {
        self.bounded(self.inner.get(short_code)).await
    }

    async fn set(&self, record: &CachedRecord, ttl: Duration) -> CacheResult<()> {
        self.bounded(self.inner.set(record, ttl)).await
    }

    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        self.bounded(self.inner.invalidate(short_code)).await
    }

    async fn health_check(&self) -> bool {
        tokio::time::timeout(self.timeout, self.inner.health_check())
            .await
            .unwrap_or(false)
    }
}
