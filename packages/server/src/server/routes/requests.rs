use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};

use super::error::{require_actor, ApiError, ApiResult};
use super::extract::{JsonBody, QueryParams};
use super::reviews::StatusChange;
use crate::common::{Actor, ListParams, Page, RequestId, ServiceError};
use crate::domains::requests::actions;
use crate::domains::requests::{
    NewServiceRequest, RequestKind, RequestStatus, ServiceRequest, ServiceRequestListing,
};
use crate::server::app::AppState;

/// POST /api/requests
pub async fn submit_request_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<Actor>>,
    JsonBody(input): JsonBody<NewServiceRequest>,
) -> ApiResult<(StatusCode, Json<ServiceRequest>)> {
    let actor = auth.map(|Extension(actor)| actor);
    let request = actions::submit_request(input, actor.as_ref(), &state.deps).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// GET /api/admin/requests/:kind - `returns` or `replacements`
pub async fn list_queue_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<Actor>>,
    Path(kind): Path<String>,
    QueryParams(params): QueryParams<ListParams>,
) -> ApiResult<Json<Page<ServiceRequestListing>>> {
    let actor = require_actor(auth)?;
    let kind: RequestKind = kind
        .parse()
        .map_err(|_| ServiceError::not_found("Queue", &kind))?;
    let query = params.into_query::<RequestStatus>()?;

    Ok(Json(actions::list_queue(kind, &query, &actor, &state.deps).await?))
}

/// PATCH /api/admin/requests/:id/status
pub async fn set_request_status_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<Actor>>,
    Path(id): Path<String>,
    JsonBody(change): JsonBody<StatusChange>,
) -> ApiResult<Json<ServiceRequest>> {
    let actor = require_actor(auth)?;
    let id = RequestId::parse(&id)
        .map_err(|_| ApiError(ServiceError::validation("id", "not a valid request id")))?;
    let status: RequestStatus = change
        .status
        .parse()
        .map_err(|_| ServiceError::validation("status", format!("unknown status '{}'", change.status)))?;

    Ok(Json(
        actions::set_request_status(id, status, &actor, &state.deps).await?,
    ))
}

