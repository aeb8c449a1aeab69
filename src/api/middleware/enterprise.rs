//! Enterprise-plan authorization stage.

use axum::{extract::Request, middleware::Next, response::Response};
use serde_json::json;

use super::api_key::AuthenticatedOwner;
use crate::domain::entities::PlanTier;
use crate::error::AppError;

/// Lets only enterprise owners through. Must run after [`super::api_key::layer`].
///
/// # Errors
///
/// Returns `401 Unauthorized` if the request was not authenticated and
/// `403 Forbidden` for any other tier.
pub async fn layer(req: Request, next: Next) -> Result<Response, AppError> {
    let tier = req
        .extensions()
        .get::<AuthenticatedOwner>()
        .map(|caller| caller.owner.tier)
        .ok_or_else(|| AppError::unauthorized("Unauthorized", json!({})))?;

    if tier != PlanTier::Enterprise {
        return Err(AppError::forbidden(
            "This operation requires the enterprise plan",
            json!({ "tier": tier.as_str(), "required": PlanTier::Enterprise.as_str() }),
        ));
    }

    Ok(next.run(req).await)
}
