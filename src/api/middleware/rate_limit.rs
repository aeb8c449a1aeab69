//! Fixed-window rate limiting stages.
//!
//! - [`plan_layer`] limits each API key by its plan tier, per route.
//! - [`path_layer`] limits each client IP per route over one second.
//!
//! Both count in the shared counter store through [`crate::application::services::RateLimiter`]
//! and fail open when it is unreachable.

use axum::{
    extract::{ConnectInfo, MatchedPath, Request, State},
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::counter;
use serde_json::json;
use std::net::SocketAddr;
use tracing::info;

use super::api_key::AuthenticatedOwner;
use crate::application::services::Decision;
use crate::{error::AppError, state::AppState};

/// Per-plan limit keyed by API key. Must run after [`super::api_key::layer`].
///
/// Every response that passes through carries `X-RateLimit-Limit`,
/// `X-RateLimit-Remaining` and `X-RateLimit-Reset` (unix seconds).
///
/// # Errors
///
/// Returns `401 Unauthorized` if the request was not authenticated.
/// Rejections are `429 Too Many Requests` with `Retry-After`.
pub async fn plan_layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let api_key = req
        .extensions()
        .get::<AuthenticatedOwner>()
        .map(|caller| caller.api_key.clone())
        .ok_or_else(|| AppError::unauthorized("Unauthorized", json!({})))?;
    let resource = resource_of(&req);

    let decision = st.plan_limits.check(&api_key, &resource).await;

    let mut response = if decision.allowed {
        next.run(req).await
    } else {
        let tier = st.plan_limits.tier_of(&api_key);
        info!(tier = %tier, resource = %resource, "Plan rate limit exceeded");
        rejection(&decision, "plan")
    };

    apply_limit_headers(response.headers_mut(), &decision);
    Ok(response)
}

/// Per-client-IP limit with the configured per-path limit and a one-second window.
///
/// Rejections are `429 Too Many Requests` with `Retry-After`.
pub async fn path_layer(State(st): State<AppState>, req: Request, next: Next) -> Response {
    let ip = client_ip(&req, st.behind_proxy);
    let resource = resource_of(&req);

    let decision = st.path_limits.check(&ip, &resource).await;
    if !decision.allowed {
        info!(client_ip = %ip, resource = %resource, "Path rate limit exceeded");
        return rejection(&decision, "path");
    }

    next.run(req).await
}

fn rejection(decision: &Decision, limiter: &'static str) -> Response {
    counter!("urlgate_rate_limit_rejections_total", "limiter" => limiter).increment(1);

    let retry_after = retry_after_secs(decision);
    let mut response = AppError::rate_limited(
        "Too many requests",
        json!({ "limit": decision.limit, "retry_after": retry_after }),
    )
    .into_response();

    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    response
}

fn apply_limit_headers(headers: &mut HeaderMap, decision: &Decision) {
    headers.insert("x-ratelimit-limit", HeaderValue::from(decision.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(decision.remaining));
    headers.insert(
        "x-ratelimit-reset",
        HeaderValue::from(decision.reset_at.timestamp()),
    );
}

/// Whole seconds until the window closes, at least 1.
fn retry_after_secs(decision: &Decision) -> u64 {
    let after = decision.reset_after;
    let secs = after.as_secs() + u64::from(after.subsec_nanos() > 0);
    secs.max(1)
}

/// The route template when routing matched one, else the raw path.
fn resource_of(req: &Request) -> String {
    req.extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string())
}

/// Client IP used as the limiter subject.
///
/// Behind a trusted proxy the first `X-Forwarded-For` entry (or `X-Real-IP`)
/// wins; otherwise the peer address. `"unknown"` when neither is available.
pub fn client_ip(req: &Request, behind_proxy: bool) -> String {
    if behind_proxy && let Some(ip) = forwarded_ip(req.headers()) {
        return ip;
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    let header_str = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    header_str("x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .or_else(|| header_str("x-real-ip"))
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
}
