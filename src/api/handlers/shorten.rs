//! Handlers for the shorten endpoints.

use axum::{Extension, Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{
    BatchShortenRequest, BatchShortenResponse, BatchSummary, RecordSummary, ShortenRequest,
    ShortenResultItem,
};
use crate::api::middleware::api_key::AuthenticatedOwner;
use crate::application::services::CreateRecord;
use crate::error::AppError;
use crate::state::AppState;

/// Creates one short code for the caller.
///
/// # Endpoint
///
/// `POST /api/urls/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "original_url": "https://example.com",
///   "custom_code": "myShort",
///   "expiry_date": "2030-01-01T00:00:00Z",
///   "password": "secret"
/// }
/// ```
///
/// Only `original_url` is required.
///
/// # Errors
///
/// - `400` if validation fails
/// - `409` if the custom code is taken
/// - `503` if no free code could be generated or the store is unavailable
pub async fn shorten_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedOwner>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<RecordSummary>), AppError> {
    payload.validate()?;

    let record = state
        .shortener
        .create_record(payload.into(), caller.owner.id)
        .await?;

    Ok((StatusCode::CREATED, Json(record.into())))
}

/// Creates several short codes at once (enterprise plan only).
///
/// # Endpoint
///
/// `POST /api/urls/shorten/batch`
///
/// Items are processed independently and reported in input order; one failing
/// item does not affect the others.
///
/// # Response
///
/// ```json
/// {
///   "summary": { "total": 2, "successful": 1, "failed": 1 },
///   "items": [
///     { "original_url": "https://a.example", "short_code": "aB3xY9", "expiry_date": null },
///     { "original_url": "https://b.example", "error": { "code": "code_taken", "message": "...", "details": {} } }
///   ]
/// }
/// ```
pub async fn batch_shorten_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedOwner>,
    Json(payload): Json<BatchShortenRequest>,
) -> Result<Json<BatchShortenResponse>, AppError> {
    payload.check_size()?;

    let total = payload.urls.len();
    let urls: Vec<String> = payload
        .urls
        .iter()
        .map(|item| item.original_url.clone())
        .collect();
    let requests = payload.urls.into_iter().map(CreateRecord::from).collect();

    let results = state
        .shortener
        .batch_create(requests, caller.owner.id)
        .await;

    let items: Vec<ShortenResultItem> = urls
        .into_iter()
        .zip(results)
        .map(|(original_url, result)| match result {
            Ok(record) => ShortenResultItem::Success {
                original_url,
                short_code: record.short_code,
                expiry_date: record.expiry_date,
            },
            Err(err) => ShortenResultItem::Error {
                original_url,
                error: err.to_error_info(),
            },
        })
        .collect();

    let successful = items
        .iter()
        .filter(|item| matches!(item, ShortenResultItem::Success { .. }))
        .count();

    Ok(Json(BatchShortenResponse {
        summary: BatchSummary {
            total,
            successful,
            failed: total - successful,
        },
        items,
    }))
}
