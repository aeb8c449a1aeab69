//! Handler for short code redirects.

use axum::{
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;

use crate::api::dto::redirect::RedirectQuery;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /api/urls/redirect?code={code}&password={password}`
///
/// Public: no API key is required. The resolution itself (cache-aside lookup,
/// expiry and password checks, click counting) happens in
/// [`crate::application::services::RedirectService`].
///
/// # Errors
///
/// - `400` if `code` is missing
/// - `401` if the code is password protected and the password is missing or wrong
/// - `404` if the code is unknown, deleted or expired
pub async fn redirect_handler(
    State(state): State<AppState>,
    Query(query): Query<RedirectQuery>,
) -> Result<impl IntoResponse, AppError> {
    let code = query.code.trim();
    if code.is_empty() {
        return Err(AppError::bad_request(
            "Query parameter 'code' is required",
            json!({ "field": "code" }),
        ));
    }

    let destination = state
        .redirects
        .resolve(code, query.password.as_deref())
        .await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, destination)]))
}
