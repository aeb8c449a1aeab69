//! Business logic services for the application layer.

pub mod identity_service;
pub mod rate_limit_policy;
pub mod rate_limiter;
pub mod redirect_service;
pub mod shortener_service;

pub use identity_service::{ApiKeyBlacklist, IdentityService};
pub use rate_limit_policy::{
    PathLimits, PathRateLimitPolicy, PlanDirectory, PlanQuota, PlanQuotas, PlanRateLimitPolicy,
};
pub use rate_limiter::{Decision, RateLimiter};
pub use redirect_service::RedirectService;
pub use shortener_service::{CodePolicy, CreateRecord, MAX_RANKING_LIMIT, ShortenerService};
