//! DTOs for the expiry update endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// Request body for `PUT /api/urls/shorten/{code}/expiry`.
///
/// `expiry_date` must be present: a timestamp sets the expiry, `null` clears it.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct UpdateExpiryRequest {
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub expiry_date: Option<Option<DateTime<Utc>>>,
}

#[derive(Debug, Serialize)]
pub struct UpdateExpiryResponse {
    pub short_code: String,
    pub expiry_date: Option<DateTime<Utc>>,
}
