//! Rate-limit policies: which limit applies to a request, and under which key.
//!
//! Both policies hold read-only lookup tables built once from configuration
//! and delegate counting to the shared [`RateLimiter`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::rate_limiter::{Decision, RateLimiter};
use crate::domain::entities::PlanTier;

/// Request quota of one plan tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanQuota {
    pub max_requests: u64,
    pub window: Duration,
}

impl PlanQuota {
    pub const fn new(max_requests: u64, window_seconds: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_seconds),
        }
    }
}

/// Quota of every tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanQuotas {
    pub free: PlanQuota,
    pub hobby: PlanQuota,
    pub enterprise: PlanQuota,
}

impl PlanQuotas {
    pub fn for_tier(&self, tier: PlanTier) -> PlanQuota {
        match tier {
            PlanTier::Free => self.free,
            PlanTier::Hobby => self.hobby,
            PlanTier::Enterprise => self.enterprise,
        }
    }
}

impl Default for PlanQuotas {
    fn default() -> Self {
        Self {
            free: PlanQuota::new(5, 60),
            hobby: PlanQuota::new(10, 1),
            enterprise: PlanQuota::new(100, 1),
        }
    }
}

/// Static API key to plan tier directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanDirectory {
    tiers: HashMap<String, PlanTier>,
}

impl PlanDirectory {
    pub fn new(tiers: HashMap<String, PlanTier>) -> Self {
        Self { tiers }
    }

    /// Unknown keys get the most restrictive tier.
    pub fn tier_of(&self, api_key: &str) -> PlanTier {
        self.tiers.get(api_key).copied().unwrap_or(PlanTier::Free)
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

/// Per-API-key limiter: the key's tier picks the quota, the request path
/// is the limited resource.
pub struct PlanRateLimitPolicy {
    limiter: Arc<RateLimiter>,
    directory: PlanDirectory,
    quotas: PlanQuotas,
}

impl PlanRateLimitPolicy {
    pub fn new(limiter: Arc<RateLimiter>, directory: PlanDirectory, quotas: PlanQuotas) -> Self {
        Self {
            limiter,
            directory,
            quotas,
        }
    }

    pub fn tier_of(&self, api_key: &str) -> PlanTier {
        self.directory.tier_of(api_key)
    }

    pub async fn check(&self, api_key: &str, path: &str) -> Decision {
        let quota = self.quotas.for_tier(self.tier_of(api_key));
        self.limiter
            .allow(api_key, path, quota.max_requests, quota.window)
            .await
    }
}

/// Fixed per-path request limits, counted per second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathLimits {
    limits: HashMap<String, u64>,
    default_limit: u64,
}

impl PathLimits {
    pub fn new(limits: HashMap<String, u64>, default_limit: u64) -> Self {
        Self {
            limits,
            default_limit,
        }
    }

    /// Built-in per-path table with `default_limit` for every other path.
    pub fn with_default(default_limit: u64) -> Self {
        Self::new(
            HashMap::from([
                ("/api/urls/shorten".to_string(), 10),
                ("/api/urls/redirect".to_string(), 50),
            ]),
            default_limit,
        )
    }

    pub fn limit_for(&self, path: &str) -> u64 {
        self.limits.get(path).copied().unwrap_or(self.default_limit)
    }
}

impl Default for PathLimits {
    fn default() -> Self {
        Self::with_default(100)
    }
}

/// Per-client-IP limiter with a one-second window per path.
pub struct PathRateLimitPolicy {
    limiter: Arc<RateLimiter>,
    limits: PathLimits,
}

impl PathRateLimitPolicy {
    pub const WINDOW: Duration = Duration::from_secs(1);

    pub fn new(limiter: Arc<RateLimiter>, limits: PathLimits) -> Self {
        Self { limiter, limits }
    }

    pub async fn check(&self, client_ip: &str, path: &str) -> Decision {
        self.limiter
            .allow(client_ip, path, self.limits.limit_for(path), Self::WINDOW)
            .await
    }
}
