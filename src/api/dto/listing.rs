//! DTOs for owner listings and rankings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::application::services::MAX_RANKING_LIMIT;
use crate::domain::entities::{ClickRanking, ShortenRanking};

pub const DEFAULT_RANKING_LIMIT: i64 = 10;

/// `?limit=` of the ranking endpoints.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct RankingQuery {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<i64>,
}

impl RankingQuery {
    /// Requested limit, defaulting to 10 and clamped to `1..=100`.
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_RANKING_LIMIT)
            .clamp(1, MAX_RANKING_LIMIT)
    }
}

#[derive(Debug, Serialize)]
pub struct TopClickedItem {
    pub short_code: String,
    pub original_url: String,
    pub click_count: i64,
    pub last_accessed_at: Option<DateTime<Utc>>,
}

impl From<ClickRanking> for TopClickedItem {
    fn from(row: ClickRanking) -> Self {
        Self {
            short_code: row.short_code,
            original_url: row.original_url,
            click_count: row.click_count,
            last_accessed_at: row.last_accessed_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TopShortenedItem {
    pub original_url: String,
    pub shorten_count: i64,
}

impl From<ShortenRanking> for TopShortenedItem {
    fn from(row: ShortenRanking) -> Self {
        Self {
            original_url: row.original_url,
            shorten_count: row.shorten_count,
        }
    }
}

/// Ranking response wrapper.
#[derive(Debug, Serialize)]
pub struct RankingResponse<T> {
    pub limit: i64,
    pub items: Vec<T>,
}
