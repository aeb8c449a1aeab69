//! Redirect resolution with a cache-aside lookup.

use chrono::Utc;
use metrics::counter;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::repositories::RecordStore;
use crate::error::AppError;
use crate::infrastructure::cache::{CachedRecord, RecordCache};
use crate::utils::password::verify_password;

/// Resolves short codes to destination URLs and records the click.
///
/// The cache holds the access-control fields of a record, so a hit is checked
/// for deletion, expiry and password exactly like a store read. Cache errors
/// degrade to a store read; click-count failures never fail a redirect.
pub struct RedirectService<S: RecordStore + ?Sized> {
    store: Arc<S>,
    cache: Arc<dyn RecordCache>,
    cache_ttl: Duration,
}

impl<S: RecordStore + ?Sized> RedirectService<S> {
    pub fn new(store: Arc<S>, cache: Arc<dyn RecordCache>, cache_ttl: Duration) -> Self {
        Self {
            store,
            cache,
            cache_ttl,
        }
    }

    /// Resolves `short_code` to its destination URL and counts one click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown, deleted or expired.
    /// Returns [`AppError::PasswordRequired`] / [`AppError::InvalidPassword`] for
    /// protected codes without a matching password.
    /// Returns [`AppError::Unavailable`] if the store fails on a cache miss.
    pub async fn resolve(
        &self,
        short_code: &str,
        password: Option<&str>,
    ) -> Result<String, AppError> {
        let (access, cached) = match self.cache.get(short_code).await {
            Ok(Some(access)) => {
                counter!("urlgate_cache_hits_total").increment(1);
                (access, true)
            }
            Ok(None) => {
                counter!("urlgate_cache_misses_total").increment(1);
                (self.load(short_code).await?, false)
            }
            Err(e) => {
                warn!(short_code, error = %e, "Cache read failed, falling back to store");
                counter!("urlgate_cache_errors_total").increment(1);
                (self.load(short_code).await?, false)
            }
        };

        if let Err(e) = self.enforce(&access, password).await {
            if cached && matches!(e, AppError::NotFound { .. }) {
                self.evict(short_code).await;
            }
            return Err(e);
        }

        if !cached {
            self.populate(&access).await;
        }

        match self.store.increment_click(access.id).await {
            Ok(true) => {}
            Ok(false) => {
                // Cached entry outlived its record, possibly into a reuse of the code.
                self.evict(short_code).await;
                return Err(not_found(short_code));
            }
            Err(e) => warn!(short_code, error = %e, "Click increment failed"),
        }

        counter!("urlgate_redirects_total").increment(1);
        debug!(short_code, cached, "Resolved short code");
        Ok(access.original_url)
    }

    async fn load(&self, short_code: &str) -> Result<CachedRecord, AppError> {
        self.store
            .find_active_by_code(short_code)
            .await?
            .map(|record| CachedRecord::from(&record))
            .ok_or_else(|| not_found(short_code))
    }

    async fn enforce(&self, access: &CachedRecord, password: Option<&str>) -> Result<(), AppError> {
        if access.is_deleted || access.is_expired_at(Utc::now()) {
            return Err(not_found(&access.short_code));
        }

        let Some(hash) = &access.password_hash else {
            return Ok(());
        };

        let Some(password) = password.filter(|p| !p.trim().is_empty()) else {
            return Err(AppError::password_required(
                "Password required",
                json!({ "code": access.short_code }),
            ));
        };

        if !verify_password(password.to_string(), hash.clone()).await? {
            return Err(AppError::invalid_password(
                "Incorrect password",
                json!({ "code": access.short_code }),
            ));
        }

        Ok(())
    }

    async fn populate(&self, access: &CachedRecord) {
        if let Err(e) = self.cache.set(access, self.cache_ttl).await {
            warn!(short_code = %access.short_code, error = %e, "Cache population failed");
            counter!("urlgate_cache_errors_total").increment(1);
        }
    }

    async fn evict(&self, short_code: &str) {
        if let Err(e) = self.cache.invalidate(short_code).await {
            warn!(short_code, error = %e, "Cache eviction failed");
            counter!("urlgate_cache_errors_total").increment(1);
        }
    }
}

fn not_found(short_code: &str) -> AppError {
    AppError::not_found("Short code not found", json!({ "code": short_code }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ShortCodeRecord;
    use crate::domain::repositories::MockRecordStore;
    use crate::infrastructure::cache::{CacheError, MemoryCache, MockRecordCache};
    use crate::utils::password::hash_password;
    use chrono::{DateTime, Duration as ChronoDuration};

    const TTL: Duration = Duration::from_secs(3600);

    fn record(
        code: &str,
        expiry_date: Option<DateTime<Utc>>,
        password_hash: Option<String>,
    ) -> ShortCodeRecord {
        ShortCodeRecord {
            id: 1,
            short_code: code.to_string(),
            original_url: "https://example.com".to_string(),
            owner_id: 1,
            created_at: Utc::now(),
            last_accessed_at: None,
            click_count: 0,
            expiry_date,
            password_hash,
            is_deleted: false,
        }
    }

    #[tokio::test]
    async fn test_miss_reads_store_and_populates_cache() {
        let mut store = MockRecordStore::new();
        store
            .expect_find_active_by_code()
            .times(1)
            .returning(|code| Ok(Some(record(code, None, None))));
        store
            .expect_increment_click()
            .times(2)
            .returning(|_| Ok(true));

        let cache = Arc::new(MemoryCache::new());
        let service = RedirectService::new(Arc::new(store), cache.clone(), TTL);

        assert_eq!(service.resolve("abc", None).await.unwrap(), "https://example.com");
        assert_eq!(cache.len(), 1);
        // Second call is served from the cache: store lookup expected once only.
        assert_eq!(service.resolve("abc", None).await.unwrap(), "https://example.com");
    }

    #[tokio::test]
    async fn test_unknown_code_is_not_found() {
        let mut store = MockRecordStore::new();
        store.expect_find_active_by_code().returning(|_| Ok(None));
        store.expect_increment_click().never();

        let service = RedirectService::new(Arc::new(store), Arc::new(MemoryCache::new()), TTL);
        let err = service.resolve("nope", None).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_expired_record_is_not_found_and_not_cached() {
        let mut store = MockRecordStore::new();
        store
            .expect_find_active_by_code()
            .returning(|code| Ok(Some(record(code, Some(Utc::now()), None))));
        store.expect_increment_click().never();

        let cache = Arc::new(MemoryCache::new());
        let service = RedirectService::new(Arc::new(store), cache.clone(), TTL);
        let err = service.resolve("abc", None).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_stale_cache_hit_is_enforced() {
        let cache = Arc::new(MemoryCache::new());
        let expired = record("abc", Some(Utc::now() - ChronoDuration::seconds(5)), None);
        cache.set(&CachedRecord::from(&expired), TTL).await.unwrap();

        let mut store = MockRecordStore::new();
        store.expect_find_active_by_code().never();
        store.expect_increment_click().never();

        let service = RedirectService::new(Arc::new(store), cache.clone(), TTL);
        let err = service.resolve("abc", None).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
        assert!(cache.is_empty(), "expired entry should be evicted");
    }

    #[tokio::test]
    async fn test_password_gate_applies_to_cache_hits() {
        let hash = hash_password("pw".to_string()).await.unwrap();
        let cache = Arc::new(MemoryCache::new());
        cache
            .set(&CachedRecord::from(&record("abc", None, Some(hash))), TTL)
            .await
            .unwrap();

        let mut store = MockRecordStore::new();
        store
            .expect_increment_click()
            .times(1)
            .returning(|_| Ok(true));
        let service = RedirectService::new(Arc::new(store), cache, TTL);

        assert!(matches!(
            service.resolve("abc", None).await,
            Err(AppError::PasswordRequired { .. })
        ));
        assert!(matches!(
            service.resolve("abc", Some("   ")).await,
            Err(AppError::PasswordRequired { .. })
        ));
        assert!(matches!(
            service.resolve("abc", Some("wrong")).await,
            Err(AppError::InvalidPassword { .. })
        ));
        assert_eq!(service.resolve("abc", Some("pw")).await.unwrap(), "https://example.com");
    }

    #[tokio::test]
    async fn test_cache_failure_degrades_to_store() {
        let mut cache = MockRecordCache::new();
        cache
            .expect_get()
            .returning(|_| Err(CacheError::Timeout(Duration::from_millis(200))));
        cache
            .expect_set()
            .times(1)
            .returning(|_, _| Err(CacheError::ConnectionError("refused".to_string())));

        let mut store = MockRecordStore::new();
        store
            .expect_find_active_by_code()
            .times(1)
            .returning(|code| Ok(Some(record(code, None, None))));
        store
            .expect_increment_click()
            .times(1)
            .returning(|_| Ok(true));

        let service = RedirectService::new(Arc::new(store), Arc::new(cache), TTL);
        assert_eq!(service.resolve("abc", None).await.unwrap(), "https://example.com");
    }

    #[tokio::test]
    async fn test_increment_failure_does_not_fail_redirect() {
        let mut store = MockRecordStore::new();
        store
            .expect_find_active_by_code()
            .returning(|code| Ok(Some(record(code, None, None))));
        store
            .expect_increment_click()
            .returning(|_| Err(AppError::unavailable("down", json!({}))));

        let service = RedirectService::new(Arc::new(store), Arc::new(MemoryCache::new()), TTL);
        assert!(service.resolve("abc", None).await.is_ok());
    }

    #[tokio::test]
    async fn test_cache_hit_for_vanished_record_is_evicted() {
        let cache = Arc::new(MemoryCache::new());
        cache
            .set(&CachedRecord::from(&record("abc", None, None)), TTL)
            .await
            .unwrap();

        let mut store = MockRecordStore::new();
        store.expect_increment_click().returning(|_| Ok(false));

        let service = RedirectService::new(Arc::new(store), cache.clone(), TTL);
        let err = service.resolve("abc", None).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_cached_entry_of_deleted_record_never_reaches_reused_code() {
        use crate::domain::entities::NewRecord;
        use crate::infrastructure::persistence::MemoryRecordStore;

        let new_record = |url: &str, owner_id| NewRecord {
            short_code: "promo".to_string(),
            original_url: url.to_string(),
            owner_id,
            expiry_date: None,
            password_hash: None,
        };

        let store = Arc::new(MemoryRecordStore::new());
        let cache = Arc::new(MemoryCache::new());
        let service = RedirectService::new(store.clone(), cache.clone(), TTL);

        let old = store.create(new_record("https://old.example", 1)).await.unwrap();
        assert_eq!(service.resolve("promo", None).await.unwrap(), "https://old.example");
        assert_eq!(cache.len(), 1);

        // Deleted without invalidating, then the code is taken again.
        store.soft_delete(old.id).await.unwrap();
        let reused = store.create(new_record("https://new.example", 2)).await.unwrap();

        let err = service.resolve("promo", None).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
        assert!(cache.is_empty());

        let rows = store.all_records().await;
        assert_eq!(rows[1].id, reused.id);
        assert_eq!(rows[1].click_count, 0);

        assert_eq!(service.resolve("promo", None).await.unwrap(), "https://new.example");
        assert_eq!(store.all_records().await[1].click_count, 1);
    }

    #[tokio::test]
    async fn test_store_failure_on_miss_is_unavailable() {
        let mut store = MockRecordStore::new();
        store
            .expect_find_active_by_code()
            .returning(|_| Err(AppError::unavailable("down", json!({}))));

        let service = RedirectService::new(Arc::new(store), Arc::new(MemoryCache::new()), TTL);
        let err = service.resolve("abc", None).await.unwrap_err();

        assert!(matches!(err, AppError::Unavailable { .. }));
    }
}
