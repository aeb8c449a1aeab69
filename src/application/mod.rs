//! Application layer services implementing business logic.
//!
//! Services consume repository and infrastructure traits and give the HTTP
//! handlers a typed API.
//!
//! - [`services::shortener_service::ShortenerService`] - create, update, soft-delete, rankings
//! - [`services::redirect_service::RedirectService`] - cache-aside code resolution
//! - [`services::rate_limiter::RateLimiter`] - fixed-window counting
//! - [`services::rate_limit_policy`] - per-plan and per-path limits
//! - [`services::identity_service::IdentityService`] - API key authentication

pub mod services;
