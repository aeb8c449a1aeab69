//! DTOs for the delete endpoint.

use serde::{Deserialize, Serialize};

/// `DELETE /api/urls/delete/{code}?password=...`
#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub short_code: String,
    pub deleted: bool,
}
