//! Cache-aside layer for redirect lookups.
//!
//! Provides a [`RecordCache`] trait with three implementations:
//! - [`RedisCache`] - shared Redis-backed cache
//! - [`MemoryCache`] - process-local cache for tests and single-node runs
//! - [`NullCache`] - no-op, used when no Redis is configured
//!
//! [`TimeoutCache`] bounds the calls of any of them.

mod memory_cache;
mod null_cache;
mod redis_cache;
mod service;
mod timeout_cache;

pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CachedRecord, RecordCache};
pub use timeout_cache::TimeoutCache;

#[cfg(test)]
pub use service::MockRecordCache;
