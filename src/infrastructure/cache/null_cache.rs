//! No-op record cache.

use super::service::{CacheResult, CachedRecord, RecordCache};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// A cache that never stores anything; every lookup is a miss.
///
/// Used when no Redis is configured, so every redirect reads the store.
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordCache for NullCache {
    async fn get(&self, _short_code: &str) -> CacheResult<Option<CachedRecord>> {
        Ok(None)
    }

    async fn set(&self, _record: &CachedRecord, _ttl: Duration) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _short_code: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
