//! Short-code creation and lifecycle service.

use chrono::{DateTime, Utc};
use metrics::counter;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::entities::{ClickRanking, NewRecord, ShortCodeRecord, ShortenRanking};
use crate::domain::repositories::RecordStore;
use crate::error::AppError;
use crate::infrastructure::cache::RecordCache;
use crate::utils::code_generator::{MAX_CODE_LENGTH, generate_code};
use crate::utils::password::{hash_password, verify_password};

/// Largest `n` accepted by the ranking queries.
pub const MAX_RANKING_LIMIT: i64 = 100;

/// One shorten request.
#[derive(Debug, Clone, Default)]
pub struct CreateRecord {
    pub original_url: String,
    /// Blank values are treated as absent; surrounding whitespace is trimmed.
    pub custom_code: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    /// Plaintext; only its hash is stored. Blank values are treated as absent.
    pub password: Option<String>,
}

/// Generation settings for [`ShortenerService`].
#[derive(Debug, Clone, Copy)]
pub struct CodePolicy {
    pub length: usize,
    pub max_attempts: u32,
}

/// Service for creating, updating and soft-deleting short-code records.
///
/// The store is the final arbiter of code uniqueness: a pre-insert lookup
/// catches most collisions, and a [`AppError::CodeTaken`] from the insert
/// itself is retried for generated codes and returned for custom ones.
pub struct ShortenerService<S: RecordStore + ?Sized> {
    store: Arc<S>,
    cache: Arc<dyn RecordCache>,
    policy: CodePolicy,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl<S: RecordStore + ?Sized> ShortenerService<S> {
    pub fn new(store: Arc<S>, cache: Arc<dyn RecordCache>, policy: CodePolicy) -> Self {
        Self {
            store,
            cache,
            policy,
        }
    }

    /// Creates a record for `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is blank or contains control
    /// characters, or if the custom code is too long.
    /// Returns [`AppError::CodeTaken`] if the custom code is held by a live record.
    /// Returns [`AppError::CodeSpaceExhausted`] if no free code was found within
    /// the configured number of attempts.
    /// Returns [`AppError::Unavailable`] if the store fails.
    pub async fn create_record(
        &self,
        request: CreateRecord,
        owner_id: i64,
    ) -> Result<ShortCodeRecord, AppError> {
        if request.original_url.trim().is_empty() {
            return Err(AppError::bad_request(
                "Original URL must not be blank",
                json!({ "field": "original_url" }),
            ));
        }

        // Control characters cannot be sent back in a `Location` header.
        if request.original_url.chars().any(char::is_control) {
            return Err(AppError::bad_request(
                "Original URL must not contain control characters",
                json!({ "field": "original_url" }),
            ));
        }

        // Redirect lookups trim the queried code, so stored codes are trimmed too.
        let custom_code = non_blank(request.custom_code).map(|code| code.trim().to_string());
        if let Some(code) = &custom_code
            && code.chars().count() > MAX_CODE_LENGTH
        {
            return Err(AppError::bad_request(
                "Custom code is too long",
                json!({ "max_length": MAX_CODE_LENGTH, "provided_length": code.chars().count() }),
            ));
        }

        let password_hash = match non_blank(request.password) {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        let template = NewRecord {
            short_code: String::new(),
            original_url: request.original_url,
            owner_id,
            expiry_date: request.expiry_date,
            password_hash,
        };

        let record = match custom_code {
            Some(code) => self.insert_custom(code, template).await?,
            None => self.insert_generated(template).await?,
        };

        info!(
            short_code = %record.short_code,
            owner_id,
            protected = record.is_password_protected(),
            "Short code created"
        );
        Ok(record)
    }

    async fn insert_custom(
        &self,
        code: String,
        template: NewRecord,
    ) -> Result<ShortCodeRecord, AppError> {
        if self.store.find_active_by_code(&code).await?.is_some() {
            return Err(AppError::code_taken(
                "Custom code is already taken",
                json!({ "code": code }),
            ));
        }

        self.store
            .create(NewRecord {
                short_code: code,
                ..template
            })
            .await
    }

    async fn insert_generated(&self, template: NewRecord) -> Result<ShortCodeRecord, AppError> {
        for attempt in 1..=self.policy.max_attempts {
            let code = generate_code(self.policy.length);

            if self.store.find_active_by_code(&code).await?.is_some() {
                debug!(attempt, "Generated code collided with a live record");
                counter!("urlgate_code_collisions_total").increment(1);
                continue;
            }

            let candidate = NewRecord {
                short_code: code,
                ..template.clone()
            };
            match self.store.create(candidate).await {
                Ok(record) => return Ok(record),
                Err(AppError::CodeTaken { .. }) => {
                    debug!(attempt, "Generated code lost an insert race");
                    counter!("urlgate_code_collisions_total").increment(1);
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            attempts = self.policy.max_attempts,
            length = self.policy.length,
            "Gave up generating a free short code"
        );
        Err(AppError::code_space_exhausted(
            "Could not find a free short code",
            json!({ "attempts": self.policy.max_attempts, "length": self.policy.length }),
        ))
    }

    /// Creates each request independently, preserving input order.
    ///
    /// A failing item never aborts the batch; its slot holds the error instead.
    pub async fn batch_create(
        &self,
        requests: Vec<CreateRecord>,
        owner_id: i64,
    ) -> Vec<Result<ShortCodeRecord, AppError>> {
        let mut results = Vec::with_capacity(requests.len());
        for request in requests {
            results.push(self.create_record(request, owner_id).await);
        }
        results
    }

    /// Loads the live record for `short_code` and checks that `owner_id` owns it.
    async fn owned_record(
        &self,
        short_code: &str,
        owner_id: i64,
    ) -> Result<Option<ShortCodeRecord>, AppError> {
        Ok(self
            .store
            .find_active_by_code(short_code)
            .await?
            .filter(|record| record.owner_id == owner_id))
    }

    /// Sets or clears the expiry of an owned record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live record holds the code.
    /// Returns [`AppError::Forbidden`] if the record belongs to another owner.
    /// Returns [`AppError::Unavailable`] if the store fails.
    pub async fn update_expiry(
        &self,
        short_code: &str,
        owner_id: i64,
        expiry_date: Option<DateTime<Utc>>,
    ) -> Result<(), AppError> {
        let not_found =
            || AppError::not_found("Short code not found", json!({ "code": short_code }));

        let record = self
            .store
            .find_active_by_code(short_code)
            .await?
            .ok_or_else(not_found)?;

        if record.owner_id != owner_id {
            return Err(AppError::forbidden(
                "Short code belongs to another owner",
                json!({ "code": short_code }),
            ));
        }

        if !self.store.update_expiry(record.id, expiry_date).await? {
            return Err(not_found());
        }

        self.invalidate(short_code).await;
        info!(short_code, owner_id, expiry = ?expiry_date, "Expiry updated");
        Ok(())
    }

    /// Soft-deletes an owned record.
    ///
    /// Returns `Ok(false)` when no live record holds the code for this owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::PasswordRequired`] if the record is protected and no
    /// password was given, [`AppError::InvalidPassword`] if it does not match.
    /// Returns [`AppError::Unavailable`] if the store fails.
    pub async fn soft_delete(
        &self,
        short_code: &str,
        owner_id: i64,
        password: Option<String>,
    ) -> Result<bool, AppError> {
        let Some(record) = self.owned_record(short_code, owner_id).await? else {
            return Ok(false);
        };

        if let Some(hash) = record.password_hash.clone() {
            let Some(password) = non_blank(password) else {
                return Err(AppError::password_required(
                    "Password required",
                    json!({ "code": short_code }),
                ));
            };
            if !verify_password(password, hash).await? {
                return Err(AppError::invalid_password(
                    "Incorrect password",
                    json!({ "code": short_code }),
                ));
            }
        }

        let deleted = self.store.soft_delete(record.id).await?;
        if deleted {
            self.invalidate(short_code).await;
            info!(short_code, owner_id, "Short code soft-deleted");
        }
        Ok(deleted)
    }

    /// Live records of an owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the store fails.
    pub async fn list_owned(&self, owner_id: i64) -> Result<Vec<ShortCodeRecord>, AppError> {
        self.store.list_by_owner(owner_id).await
    }

    /// Most-clicked live records; `n` is clamped to `1..=100`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the store fails.
    pub async fn top_by_clicks(&self, n: i64) -> Result<Vec<ClickRanking>, AppError> {
        self.store
            .top_by_clicks(n.clamp(1, MAX_RANKING_LIMIT))
            .await
    }

    /// Most-shortened destination URLs; `n` is clamped to `1..=100`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the store fails.
    pub async fn top_by_shorten_count(&self, n: i64) -> Result<Vec<ShortenRanking>, AppError> {
        self.store
            .top_by_shorten_count(n.clamp(1, MAX_RANKING_LIMIT))
            .await
    }

    async fn invalidate(&self, short_code: &str) {
        if let Err(e) = self.cache.invalidate(short_code).await {
            warn!(short_code, error = %e, "Cache invalidation failed");
            counter!("urlgate_cache_errors_total").increment(1);
        }
    }
}
