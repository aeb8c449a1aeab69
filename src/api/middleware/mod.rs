//! Request pipeline stages.
//!
//! Each stage either short-circuits with an error response or passes the
//! request on. Routes compose them in a fixed order:
//! blacklist, API key, (batch only) enterprise, plan rate limit, path rate limit.

pub mod api_key;
pub mod blacklist;
pub mod enterprise;
pub mod rate_limit;
pub mod tracing;
