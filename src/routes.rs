//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /health`                - component health (public)
//! - `GET /api/urls/redirect`     - short code redirect (public, IP limited)
//! - `/api/urls/*`                - owner API (`X-API-KEY` required)
//!
//! Every request is wrapped in a tracing span.

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;

/// Constructs the application router with all routes and middleware.
///
/// Trailing-slash normalization is applied around the finished router in
/// [`crate::server::run`], since it must run before routing.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .merge(api::routes::protected_routes(&state))
        .merge(api::routes::public_routes(&state))
        .with_state(state)
        .layer(tracing::layer())
}
