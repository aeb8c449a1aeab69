//! Infrastructure layer for external integrations.
//!
//! Concrete implementations of the contracts the services depend on:
//!
//! - [`cache`] - record cache (Redis, in-memory and no-op)
//! - [`counter`] - rate-limit counters (Redis and in-memory)
//! - [`persistence`] - record and owner stores (PostgreSQL and in-memory)

pub mod cache;
pub mod counter;
pub mod persistence;

use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::info;

/// Opens a Redis connection manager shared by the cache and the counter store,
/// and validates it with a PING.
///
/// # Errors
///
/// Returns the Redis error if the URL is invalid, the connection cannot be
/// established, or the PING fails.
pub async fn connect_redis(redis_url: &str) -> Result<ConnectionManager, redis::RedisError> {
    let client = Client::open(redis_url)?;
    let mut manager = ConnectionManager::new(client).await?;
    manager.ping::<()>().await?;

    info!("✓ Connected to Redis");
    Ok(manager)
}
