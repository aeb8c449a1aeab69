//! API key authentication and blacklisting.

use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::entities::Owner;
use crate::domain::repositories::OwnerRepository;
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Resolves an `X-API-KEY` value to the owner it belongs to.
///
/// Keys are hashed with HMAC-SHA256 (keyed by `signing_secret`) before lookup,
/// so the store never sees a raw key and a leaked table cannot be replayed.
pub struct IdentityService<R: OwnerRepository + ?Sized> {
    repository: Arc<R>,
    signing_secret: String,
}

impl<R: OwnerRepository + ?Sized> IdentityService<R> {
    pub fn new(repository: Arc<R>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Returns the 64-character lowercase hex HMAC of a raw key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the signing secret is rejected by HMAC.
    pub fn hash_key(&self, api_key: &str) -> Result<String, AppError> {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes()).map_err(|e| {
            AppError::internal("Invalid signing secret", json!({ "reason": e.to_string() }))
        })?;
        mac.update(api_key.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Finds the owner of `api_key`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the key is blank or unknown.
    /// Returns [`AppError::Unavailable`] if the owner store cannot be reached.
    pub async fn authenticate(&self, api_key: &str) -> Result<Owner, AppError> {
        if api_key.trim().is_empty() {
            return Err(AppError::unauthorized(
                "Missing API key",
                json!({ "header": "X-API-KEY" }),
            ));
        }

        let key_hash = self.hash_key(api_key)?;

        self.repository
            .find_by_key_hash(&key_hash)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized("Unauthorized", json!({ "reason": "Unknown API key" }))
            })
    }
}

/// API keys refused before authentication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiKeyBlacklist {
    keys: HashSet<String>,
}

impl ApiKeyBlacklist {
    pub fn new(keys: impl IntoIterator<Item = String>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    pub fn contains(&self, api_key: &str) -> bool {
        self.keys.contains(api_key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
