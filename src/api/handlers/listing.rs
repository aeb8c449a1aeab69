//! Handlers for owner listings and rankings.

use axum::{
    Extension, Json,
    extract::{Query, State},
};

use crate::api::dto::listing::{RankingQuery, RankingResponse, TopClickedItem, TopShortenedItem};
use crate::api::dto::shorten::RecordSummary;
use crate::api::middleware::api_key::AuthenticatedOwner;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/urls/user`: the caller's live records.
pub async fn user_urls_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedOwner>,
) -> Result<Json<Vec<RecordSummary>>, AppError> {
    let records = state.shortener.list_owned(caller.owner.id).await?;
    Ok(Json(records.into_iter().map(RecordSummary::from).collect()))
}

/// `GET /api/urls/top-clicked?limit={n}`
///
/// Most-clicked live records; ties go to the most recently accessed.
pub async fn top_clicked_handler(
    State(state): State<AppState>,
    Query(query): Query<RankingQuery>,
) -> Result<Json<RankingResponse<TopClickedItem>>, AppError> {
    let limit = query.limit();
    let rows = state.shortener.top_by_clicks(limit).await?;

    Ok(Json(RankingResponse {
        limit,
        items: rows.into_iter().map(TopClickedItem::from).collect(),
    }))
}

/// `GET /api/urls/top-shortened?limit={n}`
///
/// Destination URLs with the most short codes.
pub async fn top_shortened_handler(
    State(state): State<AppState>,
    Query(query): Query<RankingQuery>,
) -> Result<Json<RankingResponse<TopShortenedItem>>, AppError> {
    let limit = query.limit();
    let rows = state.shortener.top_by_shorten_count(limit).await?;

    Ok(Json(RankingResponse {
        limit,
        items: rows.into_iter().map(TopShortenedItem::from).collect(),
    }))
}
