#![allow(dead_code)]

use axum::{Router, extract::ConnectInfo};
use axum_test::TestServer;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use urlgate::application::services::{
    IdentityService, PathLimits, PlanDirectory, PlanQuota, PlanQuotas,
};
use urlgate::config::Config;
use urlgate::domain::entities::{Owner, PlanTier};
use urlgate::infrastructure::cache::MemoryCache;
use urlgate::infrastructure::counter::MemoryCounterStore;
use urlgate::infrastructure::persistence::{MemoryOwnerRepository, MemoryRecordStore};
use urlgate::routes::app_router;
use urlgate::state::{AppState, Backends};

pub const SIGNING_SECRET: &str = "test-signing-secret";

pub const ENTERPRISE_KEY: &str = "key-enterprise";
pub const HOBBY_KEY: &str = "key-hobby";
pub const FREE_KEY: &str = "key-free";
/// Registered owner whose key is also blacklisted.
pub const LEAKED_KEY: &str = "key-leaked";

pub const ENTERPRISE_OWNER: i64 = 1;
pub const HOBBY_OWNER: i64 = 2;
pub const FREE_OWNER: i64 = 3;

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/test".to_string(),
        redis_url: None,
        listen_addr: "127.0.0.1:0".to_string(),
        log_level: "info".to_string(),
        log_format: "text".to_string(),
        behind_proxy: false,
        cache_ttl_seconds: 3600,
        short_code_length: 6,
        code_generation_max_attempts: 32,
        store_timeout_ms: 2000,
        cache_timeout_ms: 200,
        counter_timeout_ms: 200,
        api_key_signing_secret: SIGNING_SECRET.to_string(),
        plan_directory: PlanDirectory::new(HashMap::from([
            (ENTERPRISE_KEY.to_string(), PlanTier::Enterprise),
            (HOBBY_KEY.to_string(), PlanTier::Hobby),
        ])),
        plan_quotas: PlanQuotas {
            free: PlanQuota::new(5, 60),
            hobby: PlanQuota::new(1000, 60),
            enterprise: PlanQuota::new(1000, 60),
        },
        path_limits: PathLimits::new(HashMap::new(), 1000),
        blacklisted_api_keys: vec![LEAKED_KEY.to_string()],
        db_max_connections: 1,
        db_connect_timeout: 1,
        db_idle_timeout: 1,
        db_max_lifetime: 1,
    }
}

fn key_hash(api_key: &str) -> String {
    IdentityService::new(Arc::new(MemoryOwnerRepository::new()), SIGNING_SECRET.to_string())
        .hash_key(api_key)
        .unwrap()
}

fn owners() -> MemoryOwnerRepository {
    MemoryOwnerRepository::new()
        .with_owner(
            key_hash(ENTERPRISE_KEY),
            Owner {
                id: ENTERPRISE_OWNER,
                tier: PlanTier::Enterprise,
            },
        )
        .with_owner(
            key_hash(HOBBY_KEY),
            Owner {
                id: HOBBY_OWNER,
                tier: PlanTier::Hobby,
            },
        )
        .with_owner(
            key_hash(FREE_KEY),
            Owner {
                id: FREE_OWNER,
                tier: PlanTier::Free,
            },
        )
        .with_owner(
            key_hash(LEAKED_KEY),
            Owner {
                id: 4,
                tier: PlanTier::Enterprise,
            },
        )
}

#[derive(Clone)]
struct MockConnectInfoLayer;

impl<S> tower::Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// Full router over in-memory backends, with handles to inspect them.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryRecordStore>,
    pub cache: Arc<MemoryCache>,
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(test_config())
}

pub fn spawn_app_with(config: Config) -> TestApp {
    let store = Arc::new(MemoryRecordStore::new());
    let cache = Arc::new(MemoryCache::new());

    let state = AppState::new(
        Backends {
            store: store.clone(),
            owners: Arc::new(owners()),
            cache: cache.clone(),
            counters: Arc::new(MemoryCounterStore::new()),
        },
        &config,
    );

    let app: Router = app_router(state).layer(MockConnectInfoLayer);
    let server = TestServer::new(app).unwrap();

    TestApp {
        server,
        store,
        cache,
    }
}

impl TestApp {
    /// Creates a short code through the API and returns the response body.
    pub async fn shorten(&self, api_key: &str, body: Value) -> Value {
        let response = self
            .server
            .post("/api/urls/shorten")
            .add_header("x-api-key", api_key)
            .json(&body)
            .await;
        assert_eq!(response.status_code(), 201, "{}", response.text());
        response.json::<Value>()
    }

    pub async fn shorten_url(&self, api_key: &str, url: &str) -> String {
        let body = self.shorten(api_key, json!({ "original_url": url })).await;
        body["short_code"].as_str().unwrap().to_string()
    }
}
