//! Repository trait for short-code records.

use crate::domain::entities::{ClickRanking, NewRecord, ShortCodeRecord, ShortenRanking};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Durable store for short-code records.
///
/// The store is the final arbiter of code uniqueness: at most one non-deleted
/// record may hold a given code, whatever the callers checked beforehand.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgRecordStore`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryRecordStore`] - in-process
/// - [`crate::infrastructure::persistence::TimeoutRecordStore`] - bounds any store's calls
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts a new record with `click_count = 0` and `is_deleted = false`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CodeTaken`] if a non-deleted record already holds the code.
    /// Returns [`AppError::Unavailable`] if the store cannot be reached.
    async fn create(&self, new_record: NewRecord) -> Result<ShortCodeRecord, AppError>;

    /// Finds the non-deleted record holding `short_code`.
    ///
    /// Expired records are returned; expiry is enforced by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the store cannot be reached.
    async fn find_active_by_code(
        &self,
        short_code: &str,
    ) -> Result<Option<ShortCodeRecord>, AppError>;

    /// Finds a non-deleted record pointing at `original_url`, if any.
    ///
    /// Lookup by destination for store consumers. Creation never deduplicates
    /// on it: shortening the same URL twice yields two codes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the store cannot be reached.
    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<ShortCodeRecord>, AppError>;

    /// Lists the non-deleted records of an owner in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the store cannot be reached.
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<ShortCodeRecord>, AppError>;

    /// Sets or clears the expiry of a non-deleted record.
    ///
    /// Returns `Ok(false)` if the record is gone or was deleted meanwhile.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the store cannot be reached.
    async fn update_expiry(
        &self,
        id: i64,
        expiry_date: Option<DateTime<Utc>>,
    ) -> Result<bool, AppError>;

    /// Flips `is_deleted` on a non-deleted record.
    ///
    /// Returns `Ok(false)` if the record was already deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the store cannot be reached.
    async fn soft_delete(&self, id: i64) -> Result<bool, AppError>;

    /// Atomically adds one click and stamps `last_accessed_at`.
    ///
    /// Never a read-modify-write: concurrent increments are never lost.
    /// Keyed by record id, so a click never lands on a later record that
    /// reuses the code. Returns `Ok(false)` if the record is gone or deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the store cannot be reached.
    async fn increment_click(&self, id: i64) -> Result<bool, AppError>;

    /// Top `limit` live records by clicks, most recently accessed first on ties.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the store cannot be reached.
    async fn top_by_clicks(&self, limit: i64) -> Result<Vec<ClickRanking>, AppError>;

    /// Top `limit` destination URLs by number of live records pointing at them.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the store cannot be reached.
    async fn top_by_shorten_count(&self, limit: i64) -> Result<Vec<ShortenRanking>, AppError>;

    /// Checks that the store answers.
    async fn ping(&self) -> bool;
}
