//! Query parameters of the redirect endpoint.

use serde::Deserialize;

/// `GET /api/urls/redirect?code=...&password=...`
#[derive(Debug, Deserialize)]
pub struct RedirectQuery {
    #[serde(default)]
    pub code: String,
    pub password: Option<String>,
}
