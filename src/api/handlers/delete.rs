//! Handler for the soft delete endpoint.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde_json::json;

use crate::api::dto::delete::{DeleteQuery, DeleteResponse};
use crate::api::middleware::api_key::AuthenticatedOwner;
use crate::error::AppError;
use crate::state::AppState;

/// Soft-deletes one of the caller's codes. The code becomes free for reuse.
///
/// # Endpoint
///
/// `DELETE /api/urls/delete/{code}?password={password}`
///
/// # Errors
///
/// - `403` if no live record holds the code for this caller
/// - `401` if the record is password protected and the password is missing or wrong
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<DeleteQuery>,
    Extension(caller): Extension<AuthenticatedOwner>,
) -> Result<Json<DeleteResponse>, AppError> {
    let deleted = state
        .shortener
        .soft_delete(&code, caller.owner.id, query.password)
        .await?;

    if !deleted {
        return Err(AppError::forbidden(
            "Short code not found or not owned by caller",
            json!({ "code": code }),
        ));
    }

    Ok(Json(DeleteResponse {
        short_code: code,
        deleted,
    }))
}
