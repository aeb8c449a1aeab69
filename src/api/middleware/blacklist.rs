//! Blacklisted API key stage.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde_json::json;
use tracing::warn;

use super::api_key::api_key_from;
use crate::{error::AppError, state::AppState};

/// Refuses blacklisted API keys before any lookup is made.
///
/// # Errors
///
/// Returns `403 Forbidden` for a key in the configured blacklist.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(api_key) = api_key_from(req.headers())
        && st.blacklist.contains(api_key)
    {
        warn!(path = %req.uri().path(), "Blacklisted API key refused");
        return Err(AppError::forbidden(
            "API key is blacklisted",
            json!({ "header": "X-API-KEY" }),
        ));
    }

    Ok(next.run(req).await)
}
