//! PostgreSQL implementation of the owner repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::warn;

use crate::domain::entities::{Owner, OwnerAccount, PlanTier};
use crate::domain::repositories::OwnerRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct OwnerRow {
    id: i64,
    tier: String,
}

#[derive(sqlx::FromRow)]
struct OwnerAccountRow {
    id: i64,
    name: String,
    tier: String,
    created_at: DateTime<Utc>,
}

fn parse_tier(owner_id: i64, raw: &str) -> PlanTier {
    raw.parse().unwrap_or_else(|e| {
        warn!(owner_id, error = %e, "Unknown stored tier, using free");
        PlanTier::Free
    })
}

/// PostgreSQL repository for API-key owners.
///
/// Only HMAC digests of API keys are stored; raw keys are never persisted.
pub struct PgOwnerRepository {
    pool: Arc<PgPool>,
}

impl PgOwnerRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Registers an owner under an already hashed API key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CodeTaken`] if the key digest is already registered,
    /// [`AppError::Unavailable`] on other database errors.
    pub async fn create(
        &self,
        name: &str,
        key_hash: &str,
        tier: PlanTier,
    ) -> Result<Owner, AppError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO owners (name, api_key_hash, tier) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(name)
        .bind(key_hash)
        .bind(tier.as_str())
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(Owner { id, tier })
    }

    pub async fn list(&self) -> Result<Vec<OwnerAccount>, AppError> {
        let rows = sqlx::query_as::<_, OwnerAccountRow>(
            "SELECT id, name, tier, created_at FROM owners ORDER BY id",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| OwnerAccount {
                tier: parse_tier(r.id, &r.tier),
                id: r.id,
                name: r.name,
                created_at: r.created_at,
            })
            .collect())
    }

    /// Returns `false` if no owner has this id.
    pub async fn set_tier(&self, id: i64, tier: PlanTier) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE owners SET tier = $2 WHERE id = $1")
            .bind(id)
            .bind(tier.as_str())
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl OwnerRepository for PgOwnerRepository {
    async fn find_by_key_hash(&self, key_hash: &str) -> Result<Option<Owner>, AppError> {
        let row = sqlx::query_as::<_, OwnerRow>(
            "SELECT id, tier FROM owners WHERE api_key_hash = $1",
        )
        .bind(key_hash)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(|r| Owner {
            id: r.id,
            tier: parse_tier(r.id, &r.tier),
        }))
    }
}
