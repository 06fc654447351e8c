use axum::{
    extract::{Extension, Path},
    Json,
};
use serde_json::{json, Value};

use super::error::{require_actor, ApiResult};
use super::extract::JsonBody;
use crate::common::Actor;
use crate::domains::content::actions;
use crate::domains::content::{ContentBlock, ContentFields};
use crate::server::app::AppState;

/// GET /api/content
pub async fn list_content_handler(
    Extension(state): Extension<AppState>,
) -> ApiResult<Json<Vec<ContentBlock>>> {
    Ok(Json(actions::list_content(&state.deps).await?))
}

/// GET /api/content/:key - `{}` when nothing is stored under the key
pub async fn get_content_handler(
    Extension(state): Extension<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<Value>> {
    let block = actions::get_content(&key, &state.deps).await?;
    Ok(Json(match block {
        Some(block) => json!(block),
        None => json!({}),
    }))
}

/// PUT /api/content/:key
pub async fn put_content_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<Actor>>,
    Path(key): Path<String>,
    JsonBody(fields): JsonBody<ContentFields>,
) -> ApiResult<Json<ContentBlock>> {
    let actor = require_actor(auth)?;
    let block = actions::put_content(&key, fields, &actor, &state.deps).await?;
    Ok(Json(block))
}

/// DELETE /api/content/:key
pub async fn delete_content_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<Actor>>,
    Path(key): Path<String>,
) -> ApiResult<Json<Value>> {
    let actor = require_actor(auth)?;
    let deleted = actions::delete_content(&key, &actor, &state.deps).await?;
    let message = if deleted {
        "Content deleted"
    } else {
        "No content stored under this key"
    };
    Ok(Json(json!({ "message": message, "deleted": deleted })))
}
