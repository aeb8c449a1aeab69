//! Redis-backed counter store.

use super::service::{CounterError, CounterResult, CounterStore};
use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use std::time::Duration;

/// Counters shared by every instance through Redis `INCR`/`EXPIRE`/`TTL`.
pub struct RedisCounterStore {
    client: ConnectionManager,
}

impl RedisCounterStore {
    pub fn new(client: ConnectionManager) -> Self {
        Self { client }
    }
}

fn op_error(command: &str, key: &str, e: redis::RedisError) -> CounterError {
    if e.is_connection_dropped() || e.is_connection_refusal() || e.is_timeout() {
        CounterError::ConnectionError(format!("{} {}: {}", command, key, e))
    } else {
        CounterError::OperationError(format!("{} {}: {}", command, key, e))
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn incr(&self, key: &str) -> CounterResult<u64> {
        let mut conn = self.client.clone();
        let count: i64 = conn
            .incr(key, 1_i64)
            .await
            .map_err(|e| op_error("INCR", key, e))?;

        Ok(count.max(0) as u64)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> CounterResult<()> {
        let mut conn = self.client.clone();
        conn.expire::<_, ()>(key, ttl.as_secs().max(1) as i64)
            .await
            .map_err(|e| op_error("EXPIRE", key, e))
    }

    async fn ttl(&self, key: &str) -> CounterResult<Option<Duration>> {
        let mut conn = self.client.clone();
        let ttl: i64 = conn.ttl(key).await.map_err(|e| op_error("TTL", key, e))?;

        // -1: no expiry, -2: no such key
        Ok((ttl >= 0).then(|| Duration::from_secs(ttl as u64)))
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
