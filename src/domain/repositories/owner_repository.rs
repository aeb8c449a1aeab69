//! Repository trait for API-key owners.

use crate::domain::entities::Owner;
use crate::error::AppError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OwnerRepository: Send + Sync {
    /// Looks up the owner whose API key hashes to `key_hash`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the store cannot be reached.
    async fn find_by_key_hash(&self, key_hash: &str) -> Result<Option<Owner>, AppError>;
}
