//! Redis-backed record cache.

use super::service::{CacheError, CacheResult, CachedRecord, RecordCache};
use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use std::time::Duration;
use tracing::debug;

/// Redis cache for fast redirect lookups.
///
/// Entries are JSON-encoded [`CachedRecord`]s under `url:{code}`. Connection
/// reuse goes through `ConnectionManager`, which reconnects on its own.
pub struct RedisCache {
    client: ConnectionManager,
    key_prefix: String,
}

impl RedisCache {
    /// Wraps an established connection manager.
    pub fn new(client: ConnectionManager) -> Self {
        Self {
            client,
            key_prefix: "url:".to_string(),
        }
    }

    fn build_key(&self, short_code: &str) -> String {
        format!("{}{}", self.key_prefix, short_code)
    }
}

fn op_error(command: &str, key: &str, e: redis::RedisError) -> CacheError {
    if e.is_connection_dropped() || e.is_connection_refusal() || e.is_timeout() {
        CacheError::ConnectionError(format!("{} {}: {}", command, key, e))
    } else {
        CacheError::OperationError(format!("{} {}: {}", command, key, e))
    }
}

#[async_trait]
impl RecordCache for RedisCache {
    async fn get(&self, short_code: &str) -> CacheResult<Option<CachedRecord>> {
        let key = self.build_key(short_code);
        let mut conn = self.client.clone();

        let raw: Option<String> = conn
            .get(&key)
            .await
            .map_err(|e| op_error("GET", &key, e))?;

        match raw {
            Some(raw) => {
                let cached = serde_json::from_str(&raw)
                    .map_err(|e| CacheError::DecodeError(format!("{}: {}", key, e)))?;
                debug!("Cache HIT: {}", short_code);
                Ok(Some(cached))
            }
            None => {
                debug!("Cache MISS: {}", short_code);
                Ok(None)
            }
        }
    }

    async fn set(&self, record: &CachedRecord, ttl: Duration) -> CacheResult<()> {
        let key = self.build_key(&record.short_code);
        let payload = serde_json::to_string(record)
            .map_err(|e| CacheError::OperationError(format!("encode {}: {}", key, e)))?;
        let mut conn = self.client.clone();
        let ttl_seconds = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(&key, payload, ttl_seconds)
            .await
            .map_err(|e| op_error("SETEX", &key, e))?;

        debug!("Cache SET: {} (TTL: {}s)", record.short_code, ttl_seconds);
        Ok(())
    }

    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        let key = self.build_key(short_code);
        let mut conn = self.client.clone();

        let deleted: i32 = conn
            .del(&key)
            .await
            .map_err(|e| op_error("DEL", &key, e))?;

        if deleted > 0 {
            debug!("Cache INVALIDATE: {}", short_code);
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
