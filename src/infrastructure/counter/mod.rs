//! Shared counter store behind the rate limiters.
//!
//! - [`RedisCounterStore`] - shared across instances
//! - [`MemoryCounterStore`] - single-process fallback

mod memory_counter;
mod redis_counter;
mod service;

pub use memory_counter::MemoryCounterStore;
pub use redis_counter::RedisCounterStore;
pub use service::{CounterError, CounterResult, CounterStore};

#[cfg(test)]
pub use service::MockCounterStore;
