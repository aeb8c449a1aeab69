//! Process-local counter store.

use super::service::{CounterResult, CounterStore};
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy)]
struct Counter {
    count: u64,
    expires_at: Option<Instant>,
}

impl Counter {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// Counters kept in a [`DashMap`]; each key's shard lock makes `incr` atomic
/// within the process.
///
/// Only correct for a single instance. Runs on tokio's clock so window tests
/// can use paused time.
#[derive(Default)]
pub struct MemoryCounterStore {
    counters: DashMap<String, Counter>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn incr(&self, key: &str) -> CounterResult<u64> {
        let now = Instant::now();
        let mut entry = self.counters.entry(key.to_string()).or_insert(Counter {
            count: 0,
            expires_at: None,
        });

        if !entry.is_live(now) {
            *entry = Counter {
                count: 0,
                expires_at: None,
            };
        }
        entry.count += 1;

        Ok(entry.count)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> CounterResult<()> {
        if let Some(mut counter) = self.counters.get_mut(key) {
            counter.expires_at = Some(Instant::now() + ttl);
        }
        Ok(())
    }

    async fn ttl(&self, key: &str) -> CounterResult<Option<Duration>> {
        let now = Instant::now();
        Ok(self
            .counters
            .get(key)
            .filter(|counter| counter.is_live(now))
            .and_then(|counter| counter.expires_at)
            .map(|at| at.saturating_duration_since(now)))
    }

    async fn health_check(&self) -> bool {
        true
    }
}
