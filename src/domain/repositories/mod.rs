//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated via
//! `mockall` for service tests.
//!
//! - [`RecordStore`] - short-code records, uniqueness, click counting, rankings
//! - [`OwnerRepository`] - API key to owner lookup

pub mod owner_repository;
pub mod record_store;

pub use owner_repository::OwnerRepository;
pub use record_store::RecordStore;

#[cfg(test)]
pub use owner_repository::MockOwnerRepository;
#[cfg(test)]
pub use record_store::MockRecordStore;
