use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::{require_actor, ApiError, ApiResult};
use super::extract::{JsonBody, QueryParams};
use crate::common::{Actor, ListParams, Page, ReviewId, ServiceError};
use crate::domains::reviews::actions;
use crate::domains::reviews::{NewReview, Review, ReviewListing, ReviewStatus};
use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: String,
}

fn parse_review_id(raw: &str) -> ApiResult<ReviewId> {
    ReviewId::parse(raw).map_err(|_| ApiError(ServiceError::validation("id", "not a valid review id")))
}

/// POST /api/reviews
pub async fn submit_review_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<Actor>>,
    JsonBody(input): JsonBody<NewReview>,
) -> ApiResult<(StatusCode, Json<Review>)> {
    let actor = auth.map(|Extension(actor)| actor);
    let review = actions::submit_review(input, actor.as_ref(), &state.deps).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// GET /api/admin/reviews?status=&search=&page=&pageSize=
pub async fn list_reviews_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<Actor>>,
    QueryParams(params): QueryParams<ListParams>,
) -> ApiResult<Json<Page<ReviewListing>>> {
    let actor = require_actor(auth)?;
    let query = params.into_query::<ReviewStatus>()?;
    Ok(Json(
        actions::list_reviews_for_moderation(&query, &actor, &state.deps).await?,
    ))
}

/// PATCH /api/admin/reviews/:id/status
pub async fn set_review_status_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<Actor>>,
    Path(id): Path<String>,
    JsonBody(change): JsonBody<StatusChange>,
) -> ApiResult<Json<Review>> {
    let actor = require_actor(auth)?;
    let id = parse_review_id(&id)?;
    let status: ReviewStatus = change
        .status
        .parse()
        .map_err(|_| ServiceError::validation("status", format!("unknown status '{}'", change.status)))?;

    Ok(Json(
        actions::set_review_status(id, status, &actor, &state.deps).await?,
    ))
}

/// DELETE /api/admin/reviews/:id
pub async fn delete_review_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<Actor>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let actor = require_actor(auth)?;
    let id = parse_review_id(&id)?;
    actions::delete_review(id, &actor, &state.deps).await?;
    Ok(Json(json!({ "message": "Review deleted", "id": id })))
}
