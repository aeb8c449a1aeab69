//! Owner entity and plan tiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rate-limiting plan an API key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    /// Most restrictive tier; also the fallback for unknown keys.
    #[default]
    Free,
    Hobby,
    Enterprise,
}

impl PlanTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Hobby => "hobby",
            PlanTier::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(PlanTier::Free),
            "hobby" => Ok(PlanTier::Hobby),
            "enterprise" => Ok(PlanTier::Enterprise),
            other => Err(format!("unknown plan tier '{}'", other)),
        }
    }
}

/// Authenticated principal that owns short-code records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub id: i64,
    pub tier: PlanTier,
}

/// Owner as listed by the admin tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerAccount {
    pub id: i64,
    pub name: String,
    pub tier: PlanTier,
    pub created_at: DateTime<Utc>,
}
