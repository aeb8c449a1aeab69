//! DTOs for the shorten endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::application::services::CreateRecord;
use crate::domain::entities::ShortCodeRecord;
use crate::error::{AppError, ErrorInfo};

/// Most items accepted in one batch request.
pub const MAX_BATCH_SIZE: usize = 100;

/// Request body for `POST /api/urls/shorten`, and one item of a batch.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ShortenRequest {
    #[validate(length(min = 1, message = "original_url must not be blank"))]
    pub original_url: String,

    /// Used (trimmed) when present; otherwise a code is generated.
    #[validate(length(max = 64))]
    pub custom_code: Option<String>,

    pub expiry_date: Option<DateTime<Utc>>,

    /// Required later to redirect or delete. Only a hash is stored.
    pub password: Option<String>,
}

impl From<ShortenRequest> for CreateRecord {
    fn from(request: ShortenRequest) -> Self {
        Self {
            original_url: request.original_url,
            custom_code: request.custom_code,
            expiry_date: request.expiry_date,
            password: request.password,
        }
    }
}

/// Request body for `POST /api/urls/shorten/batch`.
///
/// Items are not validated here: each one is checked on its own so that a bad
/// item fails alone instead of rejecting the whole batch.
#[derive(Debug, Deserialize)]
pub struct BatchShortenRequest {
    pub urls: Vec<ShortenRequest>,
}

impl BatchShortenRequest {
    /// Rejects empty batches and batches over [`MAX_BATCH_SIZE`].
    pub fn check_size(&self) -> Result<(), AppError> {
        let provided = self.urls.len();
        if provided == 0 || provided > MAX_BATCH_SIZE {
            return Err(AppError::bad_request(
                format!("Batch must contain between 1 and {MAX_BATCH_SIZE} URLs"),
                json!({ "field": "urls", "max": MAX_BATCH_SIZE, "provided": provided }),
            ));
        }
        Ok(())
    }
}

/// A record as returned to its owner. Never includes the password hash.
#[derive(Debug, Serialize)]
pub struct RecordSummary {
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub click_count: i64,
    pub password_protected: bool,
}

impl From<ShortCodeRecord> for RecordSummary {
    fn from(record: ShortCodeRecord) -> Self {
        let password_protected = record.is_password_protected();
        Self {
            short_code: record.short_code,
            original_url: record.original_url,
            created_at: record.created_at,
            expiry_date: record.expiry_date,
            last_accessed_at: record.last_accessed_at,
            click_count: record.click_count,
            password_protected,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchShortenResponse {
    pub summary: BatchSummary,
    pub items: Vec<ShortenResultItem>,
}

/// Outcome of one batch item, in input order.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ShortenResultItem {
    Success {
        original_url: String,
        short_code: String,
        expiry_date: Option<DateTime<Utc>>,
    },
    Error {
        original_url: String,
        error: ErrorInfo,
    },
}

#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}
