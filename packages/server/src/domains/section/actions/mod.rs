//! Section actions - read and merge-update the singleton section

use tracing::{info, warn};

use crate::common::{Actor, AdminCapability, ServiceError, ServiceResult};
use crate::domains::section::models::{
    sanitize_items, Section, SectionBody, SectionChanges, SectionPatch,
};
use crate::kernel::{ServerDeps, StoreError};

/// Attempts before giving up on a section that keeps changing under us
const MAX_ATTEMPTS: usize = 3;

/// Get the section (public). `None` until the first update creates it.
pub async fn get_section(deps: &ServerDeps) -> ServiceResult<Option<Section>> {
    Section::find_singleton(deps.store()).await
}

/// Merge a partial update into the singleton section (admin only)
///
/// Items are validated and stripped of caller identity before anything is
/// written. The first update creates the row through the store's unique
/// singleton key; a writer that loses that race merges onto the winner
/// instead of inserting a second row. Later writes are conditional on the
/// row being unchanged since it was read, so concurrent patches to different
/// fields both land.
pub async fn update_section(
    patch: SectionPatch,
    actor: &Actor,
    deps: &ServerDeps,
) -> ServiceResult<Section> {
    actor.can(AdminCapability::ManageContent).check()?;

    let changes = SectionChanges {
        title: patch.title,
        subtitle: patch.subtitle,
        is_active: patch.is_active,
        items: patch.items.map(sanitize_items).transpose()?,
    };

    for attempt in 1..=MAX_ATTEMPTS {
        match Section::find_singleton(deps.store()).await? {
            Some(existing) => {
                let body = existing.body().apply(&changes);
                if let Some(saved) = existing.save(&body, deps.store()).await? {
                    info!(
                        section_id = %saved.id,
                        items = saved.items.len(),
                        member_id = %actor.member_id(),
                        "Section updated"
                    );
                    return Ok(saved);
                }
                warn!(section_id = %existing.id, attempt, "Section changed during update, retrying");
            }
            None => {
                let body = SectionBody::default().apply(&changes);
                match Section::create(&body, deps.store()).await {
                    Ok(created) => {
                        info!(
                            section_id = %created.id,
                            items = created.items.len(),
                            member_id = %actor.member_id(),
                            "Section created"
                        );
                        return Ok(created);
                    }
                    Err(ServiceError::Store(StoreError::DuplicateKey { .. })) => {
                        warn!(attempt, "Lost section creation race, merging onto existing row");
                    }
                    Err(e) => return Err(e),
                }
            }
        }
    }

    tracing::error!(attempts = MAX_ATTEMPTS, "Section update did not settle");
    Err(ServiceError::Integrity(
        "section changed concurrently on every attempt".to_string(),
    ))
}
