//! Per-call timeout for any record store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::domain::entities::{ClickRanking, NewRecord, ShortCodeRecord, ShortenRanking};
use crate::domain::repositories::RecordStore;
use crate::error::AppError;

/// Wraps a [`RecordStore`] so that no call waits longer than `timeout`.
///
/// An elapsed call surfaces as [`AppError::Unavailable`]; the caller decides
/// whether that fails the request.
pub struct TimeoutRecordStore<S> {
    inner: S,
    timeout: Duration,
}

impl<S: RecordStore> TimeoutRecordStore<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, AppError>> + Send,
    ) -> Result<T, AppError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Record store call timed out"
                );
                Err(AppError::unavailable(
                    "Record store timed out",
                    json!({ "operation": operation }),
                ))
            }
        }
    }
}

#[async_trait]
impl<S: RecordStore> RecordStore for TimeoutRecordStore<S> {
    async fn create(&self, new_record: NewRecord) -> Result<ShortCodeRecord, AppError> {
        self.bounded("create", self.inner.create(new_record)).await
    }

    async fn find_active_by_code(
        &self,
        short_code: &str,
    ) -> Result<Option<ShortCodeRecord>, AppError> {
        self.bounded("find_active_by_code", self.inner.find_active_by_code(short_code))
            .await
    }

    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<ShortCodeRecord>, AppError> {
        self.bounded(
            "find_by_original_url",
            self.inner.find_by_original_url(original_url),
        )
        .await
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<ShortCodeRecord>, AppError> {
        self.bounded("list_by_owner", self.inner.list_by_owner(owner_id))
            .await
    }

    async fn update_expiry(
        &self,
        id: i64,
        expiry_date: Option<DateTime<Utc>>,
    ) -> Result<bool, AppError> {
        self.bounded("update_expiry", self.inner.update_expiry(id, expiry_date))
            .await
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, AppError> {
        self.bounded("soft_delete", self.inner.soft_delete(id)).await
    }

    async fn increment_click(&self, id: i64) -> Result<bool, AppError> {
        self.bounded("increment_click", self.inner.increment_click(id))
            .await
    }

    async fn top_by_clicks(&self, limit: i64) -> Result<Vec<ClickRanking>, AppError> {
        self.bounded("top_by_clicks", self.inner.top_by_clicks(limit))
            .await
    }

    async fn top_by_shorten_count(&self, limit: i64) -> Result<Vec<ShortenRanking>, AppError> {
        self.bounded("top_by_shorten_count", self.inner.top_by_shorten_count(limit))
            .await
    }

    async fn ping(&self) -> bool {
        tokio::time::timeout(self.timeout, self.inner.ping())
            .await
            .unwrap_or(false)
    }
}
