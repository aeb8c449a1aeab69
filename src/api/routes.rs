//! API route configuration and pipeline composition.
//!
//! `route_layer` wraps the routes registered so far, so stages are added
//! innermost first: the last `route_layer` call runs first.

use crate::api::handlers::{
    batch_shorten_handler, delete_handler, redirect_handler, shorten_handler,
    top_clicked_handler, top_shortened_handler, update_expiry_handler, user_urls_handler,
};
use crate::api::middleware::{api_key, blacklist, enterprise, rate_limit};
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

/// Authenticated routes.
///
/// Pipeline: blacklist → API key → (batch only) enterprise → plan limit → path limit.
///
/// # Endpoints
///
/// - `POST   /api/urls/shorten`               - create one short code
/// - `POST   /api/urls/shorten/batch`         - create many (enterprise only)
/// - `PUT    /api/urls/shorten/{code}/expiry` - set or clear expiry
/// - `DELETE /api/urls/delete/{code}`         - soft delete
/// - `GET    /api/urls/user`                  - caller's live records
/// - `GET    /api/urls/top-clicked`           - click ranking
/// - `GET    /api/urls/top-shortened`         - most shortened destinations
pub fn protected_routes(state: &AppState) -> Router<AppState> {
    let owned = limited(
        state,
        Router::new()
            .route("/api/urls/shorten", post(shorten_handler))
            .route("/api/urls/shorten/{code}/expiry", put(update_expiry_handler))
            .route("/api/urls/delete/{code}", delete(delete_handler))
            .route("/api/urls/user", get(user_urls_handler))
            .route("/api/urls/top-clicked", get(top_clicked_handler))
            .route("/api/urls/top-shortened", get(top_shortened_handler)),
    );

    let batch = limited(
        state,
        Router::new().route("/api/urls/shorten/batch", post(batch_shorten_handler)),
    )
    .route_layer(middleware::from_fn(enterprise::layer));

    owned
        .merge(batch)
        .route_layer(middleware::from_fn_with_state(state.clone(), api_key::layer))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            blacklist::layer,
        ))
}

/// Public routes. Pipeline: path limit.
///
/// - `GET /api/urls/redirect?code=&password=` - 302 to the original URL
pub fn public_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/urls/redirect", get(redirect_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::path_layer,
        ))
}

/// Plan limit, then path limit.
fn limited(state: &AppState, router: Router<AppState>) -> Router<AppState> {
    router
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::path_layer,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::plan_layer,
        ))
}
