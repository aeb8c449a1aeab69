//! Domain layer: entities and the repository contracts the services depend on.
//!
//! - [`entities`] - business data structures
//! - [`repositories`] - data access traits, implemented in
//!   [`crate::infrastructure::persistence`]
//!
//! Nothing in here depends on a concrete store.

pub mod entities;
pub mod repositories;
