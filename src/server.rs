//! HTTP server initialization and runtime setup.
//!
//! Handles database and Redis connections, backend selection, and the Axum
//! server lifecycle.

use crate::config::Config;
use crate::infrastructure::cache::{NullCache, RecordCache, RedisCache, TimeoutCache};
use crate::infrastructure::connect_redis;
use crate::infrastructure::counter::{CounterStore, MemoryCounterStore, RedisCounterStore};
use crate::infrastructure::persistence::{PgOwnerRepository, PgRecordStore, TimeoutRecordStore};
use crate::routes::app_router;
use crate::state::{AppState, Backends};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;
use tracing::{info, warn};

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Redis cache and counter store (or process-local fallbacks)
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_database(&config).await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;
    info!("Migrations applied");

    let pool = Arc::new(pool);
    let store = Arc::new(TimeoutRecordStore::new(
        PgRecordStore::new(pool.clone()),
        config.store_timeout(),
    ));
    let owners = Arc::new(PgOwnerRepository::new(pool));
    let (cache, counters) = shared_backends(&config).await;

    let state = AppState::new(
        Backends {
            store,
            owners,
            cache,
            counters,
        },
        &config,
    );

    let app = NormalizePathLayer::trim_trailing_slash().layer(app_router(state));

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn connect_database(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    info!("✓ Connected to database");
    Ok(pool)
}

/// Cache and counter store on Redis when it is configured and reachable.
///
/// Without Redis the cache is disabled and rate-limit counters are kept per
/// process, so limits are no longer shared between instances.
async fn shared_backends(config: &Config) -> (Arc<dyn RecordCache>, Arc<dyn CounterStore>) {
    let Some(redis_url) = &config.redis_url else {
        warn!("REDIS_URL not set: cache disabled, rate limits are per process");
        return local_backends();
    };

    match connect_redis(redis_url).await {
        Ok(manager) => {
            info!("Cache and rate-limit counters on Redis");
            let cache: Arc<dyn RecordCache> = Arc::new(TimeoutCache::new(
                RedisCache::new(manager.clone()),
                config.cache_timeout(),
            ));
            let counters: Arc<dyn CounterStore> = Arc::new(RedisCounterStore::new(manager));
            (cache, counters)
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to Redis: cache disabled, rate limits are per process");
            local_backends()
        }
    }
}

fn local_backends() -> (Arc<dyn RecordCache>, Arc<dyn CounterStore>) {
    let cache: Arc<dyn RecordCache> = Arc::new(NullCache::new());
    let counters: Arc<dyn CounterStore> = Arc::new(MemoryCounterStore::new());
    (cache, counters)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => warn!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
