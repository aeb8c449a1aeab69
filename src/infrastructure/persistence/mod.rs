//! Record and owner store implementations.
//!
//! - [`PgRecordStore`] / [`PgOwnerRepository`] - PostgreSQL via SQLx
//! - [`MemoryRecordStore`] / [`MemoryOwnerRepository`] - in-process, same contract
//! - [`TimeoutRecordStore`] - bounds every call of another record store

pub mod memory_owner_repository;
pub mod memory_record_store;
pub mod pg_owner_repository;
pub mod pg_record_store;
pub mod timeout;

pub use memory_owner_repository::MemoryOwnerRepository;
pub use memory_record_store::MemoryRecordStore;
pub use pg_owner_repository::PgOwnerRepository;
pub use pg_record_store::PgRecordStore;
pub use timeout::TimeoutRecordStore;
