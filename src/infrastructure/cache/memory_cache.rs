//! Process-local record cache.

use super::service::{CacheResult, CachedRecord, RecordCache};
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;

/// In-memory cache with per-entry TTL, evicted lazily on read.
///
/// Uses tokio's clock, so tests running on paused time can step past a TTL.
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, (CachedRecord, Instant)>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl RecordCache for MemoryCache {
    async fn get(&self, short_code: &str) -> CacheResult<Option<CachedRecord>> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(short_code) {
            let (cached, expires_at) = entry.value();
            if *expires_at > now {
                return Ok(Some(cached.clone()));
            }
        }

        self.entries
            .remove_if(short_code, |_, (_, expires_at)| *expires_at <= now);
        Ok(None)
    }

    async fn set(&self, record: &CachedRecord, ttl: Duration) -> CacheResult<()> {
        self.entries.insert(
            record.short_code.clone(),
            (record.clone(), Instant::now() + ttl),
        );
        Ok(())
    }

    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        self.entries.remove(short_code);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
