//! PostgreSQL implementation of the record store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{ClickRanking, NewRecord, ShortCodeRecord, ShortenRanking};
use crate::domain::repositories::RecordStore;
use crate::error::AppError;

const RECORD_COLUMNS: &str = "id, short_code, original_url, owner_id, created_at, \
     last_accessed_at, click_count, expiry_date, password_hash, is_deleted";

/// PostgreSQL store for short-code records.
///
/// Uniqueness among live records is the partial unique index
/// `short_codes_live_code_idx`; a violation surfaces as [`AppError::CodeTaken`].
pub struct PgRecordStore {
    pool: Arc<PgPool>,
}

impl PgRecordStore {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn create(&self, new_record: NewRecord) -> Result<ShortCodeRecord, AppError> {
        let sql = format!(
            r#"
            INSERT INTO short_codes (short_code, original_url, owner_id, expiry_date, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {RECORD_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, ShortCodeRecord>(&sql)
            .bind(&new_record.short_code)
            .bind(&new_record.original_url)
            .bind(new_record.owner_id)
            .bind(new_record.expiry_date)
            .bind(&new_record.password_hash)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(record)
    }

    async fn find_active_by_code(
        &self,
        short_code: &str,
    ) -> Result<Option<ShortCodeRecord>, AppError> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM short_codes WHERE short_code = $1 AND NOT is_deleted"
        );

        let record = sqlx::query_as::<_, ShortCodeRecord>(&sql)
            .bind(short_code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(record)
    }

    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<ShortCodeRecord>, AppError> {
        let sql = format!(
            r#"
            SELECT {RECORD_COLUMNS} FROM short_codes
            WHERE original_url = $1 AND NOT is_deleted
            ORDER BY id
            LIMIT 1
            "#
        );

        let record = sqlx::query_as::<_, ShortCodeRecord>(&sql)
            .bind(original_url)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(record)
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<ShortCodeRecord>, AppError> {
        let sql = format!(
            r#"
            SELECT {RECORD_COLUMNS} FROM short_codes
            WHERE owner_id = $1 AND NOT is_deleted
            ORDER BY id
            "#
        );

        let records = sqlx::query_as::<_, ShortCodeRecord>(&sql)
            .bind(owner_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(records)
    }

    async fn update_expiry(
        &self,
        id: i64,
        expiry_date: Option<DateTime<Utc>>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE short_codes SET expiry_date = $2 WHERE id = $1 AND NOT is_deleted",
        )
        .bind(id)
        .bind(expiry_date)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE short_codes SET is_deleted = TRUE WHERE id = $1 AND NOT is_deleted")
                .bind(id)
                .execute(self.pool.as_ref())
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn increment_click(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE short_codes
            SET click_count = click_count + 1, last_accessed_at = NOW()
            WHERE id = $1 AND NOT is_deleted
            "#,
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn top_by_clicks(&self, limit: i64) -> Result<Vec<ClickRanking>, AppError> {
        let rows = sqlx::query_as::<_, ClickRanking>(
            r#"
            SELECT short_code, original_url, click_count, last_accessed_at
            FROM short_codes
            WHERE NOT is_deleted
            ORDER BY click_count DESC, last_accessed_at DESC NULLS LAST, id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn top_by_shorten_count(&self, limit: i64) -> Result<Vec<ShortenRanking>, AppError> {
        let rows = sqlx::query_as::<_, ShortenRanking>(
            r#"
            SELECT original_url, COUNT(*) AS shorten_count
            FROM short_codes
            WHERE NOT is_deleted
            GROUP BY original_url
            ORDER BY shorten_count DESC, original_url
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
