use axum::{extract::Extension, Json};
use serde_json::{json, Value};

use super::error::{require_actor, ApiResult};
use super::extract::JsonBody;
use crate::common::Actor;
use crate::domains::section::actions;
use crate::domains::section::{Section, SectionPatch};
use crate::server::app::AppState;

/// GET /api/section - `{}` until the section is first written
pub async fn get_section_handler(Extension(state): Extension<AppState>) -> ApiResult<Json<Value>> {
    Ok(Json(match actions::get_section(&state.deps).await? {
        Some(section) => json!(section),
        None => json!({}),
    }))
}

/// PATCH /api/section
pub async fn update_section_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<Actor>>,
    JsonBody(patch): JsonBody<SectionPatch>,
) -> ApiResult<Json<Section>> {
    let actor = require_actor(auth)?;
    Ok(Json(actions::update_section(patch, &actor, &state.deps).await?))
}
