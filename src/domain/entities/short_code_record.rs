//! Short-code record entity and ranking rows.

use chrono::{DateTime, Utc};

/// A short code mapped to its destination URL, with access-control and
/// click-tracking metadata.
///
/// Records are never hard-deleted by the service; `is_deleted` hides a record
/// from resolution and frees its code for reuse.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ShortCodeRecord {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub click_count: i64,
    pub expiry_date: Option<DateTime<Utc>>,
    pub password_hash: Option<String>,
    pub is_deleted: bool,
}

impl ShortCodeRecord {
    /// Expired records stay visible to their owner but never resolve.
    /// The boundary is inclusive: a record expiring exactly at `now` is expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date.is_some_and(|expiry| now >= expiry)
    }

    pub fn is_password_protected(&self) -> bool {
        self.password_hash.is_some()
    }
}

/// Input for inserting a record. The password, if any, is already hashed.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub short_code: String,
    pub original_url: String,
    pub owner_id: i64,
    pub expiry_date: Option<DateTime<Utc>>,
    pub password_hash: Option<String>,
}

/// Row of the most-clicked ranking.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ClickRanking {
    pub short_code: String,
    pub original_url: String,
    pub click_count: i64,
    pub last_accessed_at: Option<DateTime<Utc>>,
}

/// Row of the most-shortened ranking: how many live records point at a URL.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ShortenRanking {
    pub original_url: String,
    pub shorten_count: i64,
}
