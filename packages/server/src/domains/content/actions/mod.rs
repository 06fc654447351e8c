//! Content actions - entry-point functions for keyed content operations
//!
//! Called directly from the HTTP routes. Actions take raw input, handle
//! validation and auth checks, and return final models.

use tracing::info;

use crate::common::{Actor, AdminCapability, ServiceResult};
use crate::domains::content::models::{validate_slug, ContentBlock, ContentFields};
use crate::kernel::ServerDeps;

/// Get the block for a slug (public). A slug that could never have been
/// written simply has no content.
pub async fn get_content(slug: &str, deps: &ServerDeps) -> ServiceResult<Option<ContentBlock>> {
    let Ok(slug) = validate_slug(slug) else {
        return Ok(None);
    };
    ContentBlock::find_by_slug(&slug, deps.store()).await
}

/// List every block (public)
pub async fn list_content(deps: &ServerDeps) -> ServiceResult<Vec<ContentBlock>> {
    ContentBlock::find_all(deps.store()).await
}

/// Create or replace the block for a slug (admin only)
///
/// Safe to repeat: pushing the same fields twice leaves the same stored state.
pub async fn put_content(
    slug: &str,
    fields: ContentFields,
    actor: &Actor,
    deps: &ServerDeps,
) -> ServiceResult<ContentBlock> {
    actor.can(AdminCapability::ManageContent).check()?;
    let slug = validate_slug(slug)?;

    let block = ContentBlock::upsert(&slug, fields, deps.store()).await?;

    info!(slug = %block.slug, member_id = %actor.member_id(), "Content block upserted");
    Ok(block)
}

/// Delete the block for a slug (admin only)
///
/// Returns whether anything was removed; deleting an absent slug succeeds.
pub async fn delete_content(slug: &str, actor: &Actor, deps: &ServerDeps) -> ServiceResult<bool> {
    actor.can(AdminCapability::ManageContent).check()?;

    let Ok(slug) = validate_slug(slug) else {
        return Ok(false);
    };
    let deleted = ContentBlock::delete_by_slug(&slug, deps.store()).await?;

    info!(%slug, deleted, member_id = %actor.member_id(), "Content block delete requested");
    Ok(deleted)
}
