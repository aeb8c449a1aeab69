//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: the record store is reachable
/// - **503 Service Unavailable**: the record store is down
///
/// Cache and counter store failures only degrade the service (redirects fall
/// back to the store, rate limits fail open), so they never turn the check red.
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store = if state.store.ping().await {
        CheckStatus::ok("Record store reachable")
    } else {
        CheckStatus::error("Record store unreachable")
    };

    let cache = if state.cache.health_check().await {
        CheckStatus::ok("Cache reachable")
    } else {
        CheckStatus::degraded("Cache unreachable, serving from the record store")
    };

    let counter_store = if state.counters.health_check().await {
        CheckStatus::ok("Counter store reachable")
    } else {
        CheckStatus::degraded("Counter store unreachable, rate limits fail open")
    };

    let store_up = store.is_ok();
    let all_ok = store_up && cache.is_ok() && counter_store.is_ok();

    let response = HealthResponse {
        status: match (store_up, all_ok) {
            (true, true) => "healthy",
            (true, false) => "degraded",
            (false, _) => "unhealthy",
        }
        .to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            store,
            cache,
            counter_store,
        },
    };

    if store_up {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
