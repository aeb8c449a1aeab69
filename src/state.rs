//! Shared application state injected into handlers and middleware.

use std::sync::Arc;

use crate::application::services::{
    ApiKeyBlacklist, CodePolicy, IdentityService, PathRateLimitPolicy, PlanRateLimitPolicy,
    RateLimiter, RedirectService, ShortenerService,
};
use crate::config::Config;
use crate::domain::repositories::{OwnerRepository, RecordStore};
use crate::infrastructure::cache::RecordCache;
use crate::infrastructure::counter::CounterStore;

/// Concrete backends the services are built on.
pub struct Backends {
    pub store: Arc<dyn RecordStore>,
    pub owners: Arc<dyn OwnerRepository>,
    pub cache: Arc<dyn RecordCache>,
    pub counters: Arc<dyn CounterStore>,
}

/// Cloned into every request; all fields are cheap `Arc` handles.
#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<ShortenerService<dyn RecordStore>>,
    pub redirects: Arc<RedirectService<dyn RecordStore>>,
    pub identity: Arc<IdentityService<dyn OwnerRepository>>,
    pub plan_limits: Arc<PlanRateLimitPolicy>,
    pub path_limits: Arc<PathRateLimitPolicy>,
    pub blacklist: Arc<ApiKeyBlacklist>,
    pub store: Arc<dyn RecordStore>,
    pub cache: Arc<dyn RecordCache>,
    pub counters: Arc<dyn CounterStore>,
    /// Read the client IP from proxy headers instead of the peer address.
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires the services over `backends` using the immutable tables in `config`.
    pub fn new(backends: Backends, config: &Config) -> Self {
        let Backends {
            store,
            owners,
            cache,
            counters,
        } = backends;

        let limiter = Arc::new(RateLimiter::new(
            counters.clone(),
            config.counter_timeout(),
        ));

        let shortener = ShortenerService::new(
            store.clone(),
            cache.clone(),
            CodePolicy {
                length: config.short_code_length,
                max_attempts: config.code_generation_max_attempts,
            },
        );
        let redirects = RedirectService::new(store.clone(), cache.clone(), config.cache_ttl());

        Self {
            shortener: Arc::new(shortener),
            redirects: Arc::new(redirects),
            identity: Arc::new(IdentityService::new(
                owners,
                config.api_key_signing_secret.clone(),
            )),
            plan_limits: Arc::new(PlanRateLimitPolicy::new(
                limiter.clone(),
                config.plan_directory.clone(),
                config.plan_quotas.clone(),
            )),
            path_limits: Arc::new(PathRateLimitPolicy::new(
                limiter,
                config.path_limits.clone(),
            )),
            blacklist: Arc::new(ApiKeyBlacklist::new(
                config.blacklisted_api_keys.iter().cloned(),
            )),
            store,
            cache,
            counters,
            behind_proxy: config.behind_proxy,
        }
    }
}
