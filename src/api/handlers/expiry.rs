//! Handler for the expiry update endpoint.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde_json::json;

use crate::api::dto::expiry::{UpdateExpiryRequest, UpdateExpiryResponse};
use crate::api::middleware::api_key::AuthenticatedOwner;
use crate::error::AppError;
use crate::state::AppState;

/// Sets (timestamp) or clears (`null`) the expiry of one of the caller's codes.
///
/// # Endpoint
///
/// `PUT /api/urls/shorten/{code}/expiry`
///
/// # Errors
///
/// - `400` if `expiry_date` is missing from the body
/// - `404` if no live record holds the code
/// - `403` if the record belongs to another owner
pub async fn update_expiry_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Extension(caller): Extension<AuthenticatedOwner>,
    Json(payload): Json<UpdateExpiryRequest>,
) -> Result<Json<UpdateExpiryResponse>, AppError> {
    let Some(expiry_date) = payload.expiry_date else {
        return Err(AppError::bad_request(
            "expiry_date is required (use null to clear it)",
            json!({ "field": "expiry_date" }),
        ));
    };

    state
        .shortener
        .update_expiry(&code, caller.owner.id, expiry_date)
        .await?;

    Ok(Json(UpdateExpiryResponse {
        short_code: code,
        expiry_date,
    }))
}
