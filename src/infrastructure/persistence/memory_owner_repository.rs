//! In-process owner repository.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::domain::entities::Owner;
use crate::domain::repositories::OwnerRepository;
use crate::error::AppError;

/// Fixed set of owners keyed by API key digest, for tests and local runs.
#[derive(Default)]
pub struct MemoryOwnerRepository {
    owners: HashMap<String, Owner>,
}

impl MemoryOwnerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_owner(mut self, key_hash: impl Into<String>, owner: Owner) -> Self {
        self.owners.insert(key_hash.into(), owner);
        self
    }
}

#[async_trait]
impl OwnerRepository for MemoryOwnerRepository {
    async fn find_by_key_hash(&self, key_hash: &str) -> Result<Option<Owner>, AppError> {
        Ok(self.owners.get(key_hash).cloned())
    }
}
