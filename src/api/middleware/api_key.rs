//! `X-API-KEY` authentication stage.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::domain::entities::Owner;
use crate::{error::AppError, state::AppState};

pub const API_KEY_HEADER: &str = "x-api-key";

/// The caller of an authenticated request, inserted into request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedOwner {
    pub owner: Owner,
    pub api_key: String,
}

/// Returns the trimmed `X-API-KEY` value, if any.
pub fn api_key_from(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Resolves the API key to its owner and makes it available to later stages
/// and handlers as an [`AuthenticatedOwner`] extension.
///
/// # Errors
///
/// Returns `401 Unauthorized` if the header is missing or the key is unknown.
pub async fn layer(
    State(st): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let api_key = api_key_from(req.headers()).unwrap_or_default().to_string();

    let owner = st.identity.authenticate(&api_key).await?;
    debug!(owner_id = owner.id, tier = %owner.tier, "Authenticated");

    req.extensions_mut()
        .insert(AuthenticatedOwner { owner, api_key });

    Ok(next.run(req).await)
}
