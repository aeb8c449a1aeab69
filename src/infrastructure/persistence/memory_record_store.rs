//! In-process record store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::cmp::Reverse;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::entities::{ClickRanking, NewRecord, ShortCodeRecord, ShortenRanking};
use crate::domain::repositories::RecordStore;
use crate::error::AppError;

#[derive(Default)]
struct Records {
    rows: Vec<ShortCodeRecord>,
    next_id: i64,
}

impl Records {
    fn live_by_code(&mut self, short_code: &str) -> Option<&mut ShortCodeRecord> {
        self.rows
            .iter_mut()
            .find(|r| !r.is_deleted && r.short_code == short_code)
    }

    fn live_by_id(&mut self, id: i64) -> Option<&mut ShortCodeRecord> {
        self.rows.iter_mut().find(|r| !r.is_deleted && r.id == id)
    }
}

/// Record store kept in memory behind a single lock.
///
/// The uniqueness check and the insert happen under one write guard, as does
/// the click increment, so the store keeps the same guarantees as the
/// PostgreSQL one within a process. Used by tests and local runs.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: RwLock<Records>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored record, soft-deleted ones included, in insertion order.
    pub async fn all_records(&self) -> Vec<ShortCodeRecord> {
        self.records.read().await.rows.clone()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn create(&self, new_record: NewRecord) -> Result<ShortCodeRecord, AppError> {
        let mut records = self.records.write().await;

        if records.live_by_code(&new_record.short_code).is_some() {
            return Err(AppError::code_taken(
                "Short code is already taken",
                json!({ "code": new_record.short_code }),
            ));
        }

        records.next_id += 1;
        let record = ShortCodeRecord {
            id: records.next_id,
            short_code: new_record.short_code,
            original_url: new_record.original_url,
            owner_id: new_record.owner_id,
            created_at: Utc::now(),
            last_accessed_at: None,
            click_count: 0,
            expiry_date: new_record.expiry_date,
            password_hash: new_record.password_hash,
            is_deleted: false,
        };
        records.rows.push(record.clone());

        Ok(record)
    }

    async fn find_active_by_code(
        &self,
        short_code: &str,
    ) -> Result<Option<ShortCodeRecord>, AppError> {
        let records = self.records.read().await;
        Ok(records
            .rows
            .iter()
            .find(|r| !r.is_deleted && r.short_code == short_code)
            .cloned())
    }

    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<ShortCodeRecord>, AppError> {
        let records = self.records.read().await;
        Ok(records
            .rows
            .iter()
            .find(|r| !r.is_deleted && r.original_url == original_url)
            .cloned())
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<ShortCodeRecord>, AppError> {
        let records = self.records.read().await;
        Ok(records
            .rows
            .iter()
            .filter(|r| !r.is_deleted && r.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn update_expiry(
        &self,
        id: i64,
        expiry_date: Option<DateTime<Utc>>,
    ) -> Result<bool, AppError> {
        let mut records = self.records.write().await;
        Ok(records
            .live_by_id(id)
            .map(|r| r.expiry_date = expiry_date)
            .is_some())
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, AppError> {
        let mut records = self.records.write().await;
        Ok(records.live_by_id(id).map(|r| r.is_deleted = true).is_some())
    }

    async fn increment_click(&self, id: i64) -> Result<bool, AppError> {
        let mut records = self.records.write().await;
        Ok(records
            .live_by_id(id)
            .map(|r| {
                r.click_count += 1;
                r.last_accessed_at = Some(Utc::now());
            })
            .is_some())
    }

    async fn top_by_clicks(&self, limit: i64) -> Result<Vec<ClickRanking>, AppError> {
        let records = self.records.read().await;
        let mut live: Vec<_> = records.rows.iter().filter(|r| !r.is_deleted).collect();
        // `None` sorts before `Some`, so never-accessed records land last.
        live.sort_by_key(|r| (Reverse(r.click_count), Reverse(r.last_accessed_at), r.id));

        Ok(live
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|r| ClickRanking {
                short_code: r.short_code.clone(),
                original_url: r.original_url.clone(),
                click_count: r.click_count,
                last_accessed_at: r.last_accessed_at,
            })
            .collect())
    }

    async fn top_by_shorten_count(&self, limit: i64) -> Result<Vec<ShortenRanking>, AppError> {
        let records = self.records.read().await;
        let mut counts: HashMap<&str, i64> = HashMap::new();
        for r in records.rows.iter().filter(|r| !r.is_deleted) {
            *counts.entry(r.original_url.as_str()).or_default() += 1;
        }

        let mut ranking: Vec<_> = counts
            .into_iter()
            .map(|(url, count)| ShortenRanking {
                original_url: url.to_string(),
                shorten_count: count,
            })
            .collect();
        ranking.sort_by(|a, b| {
            b.shorten_count
                .cmp(&a.shorten_count)
                .then_with(|| a.original_url.cmp(&b.original_url))
        });
        ranking.truncate(limit.max(0) as usize);

        Ok(ranking)
    }

    async fn ping(&self) -> bool {
        true
    }
}
