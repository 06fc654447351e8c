//! Review actions - entry points for submission and moderation
//!
//! Actions own the authorization checks and logging; all store access goes
//! through the models.

use chrono::Utc;
use tracing::{error, info, warn};

use crate::common::{
    run_list_query, Actor, AdminCapability, AuthError, ListQuery, MemberId, Page, ProductId,
    ReviewId, ServiceError, ServiceResult,
};
use crate::domains::reviews::models::{NewReview, Review, ReviewListing, ReviewStatus};
use crate::kernel::ServerDeps;

/// Attempts before giving up on a review that keeps changing under us
const MAX_ATTEMPTS: usize = 3;

/// Submit a review from the storefront. The author is the calling member.
pub async fn submit_review(
    input: NewReview,
    actor: Option<&Actor>,
    deps: &ServerDeps,
) -> ServiceResult<Review> {
    let actor = actor.ok_or(AuthError::AuthenticationRequired)?;
    let valid = input.validate()?;

    let review = Review::create(actor.member_id(), valid, deps.store()).await?;

    info!(
        review_id = %review.id,
        product_id = %review.product,
        author_id = %review.author,
        rating = review.rating,
        "Review submitted"
    );
    Ok(review)
}

/// Move a review through the moderation state machine (moderator only)
///
/// The write only lands if the review is unchanged since it was read. A
/// moderator who loses a race re-reads and re-checks the transition, so two
/// decisions on one pending review cannot both succeed.
pub async fn set_review_status(
    id: ReviewId,
    status: ReviewStatus,
    actor: &Actor,
    deps: &ServerDeps,
) -> ServiceResult<Review> {
    actor.can(AdminCapability::ModerateReviews).check()?;

    for attempt in 1..=MAX_ATTEMPTS {
        let review = Review::find_by_id(id, deps.store())
            .await?
            .ok_or_else(|| ServiceError::not_found("Review", id))?;
        let previous = review.status;

        let moderated = review
            .moderate(status, actor.member_id(), Utc::now())
            .inspect_err(|_| {
                warn!(review_id = %id, from = %previous, to = %status, "Rejected review status transition");
            })?;

        if let Some(saved) = moderated.save(deps.store()).await? {
            info!(
                review_id = %id,
                from = %previous,
                to = %saved.status,
                moderator_id = %actor.member_id(),
                "Review status changed"
            );
            return Ok(saved);
        }
        warn!(review_id = %id, attempt, "Review changed during status update, retrying");
    }

    error!(review_id = %id, attempts = MAX_ATTEMPTS, "Review status update did not settle");
    Err(ServiceError::Integrity(format!(
        "review {id} changed concurrently on every attempt"
    )))
}

/// Permanently remove a review, whatever its status (moderator only)
pub async fn delete_review(id: ReviewId, actor: &Actor, deps: &ServerDeps) -> ServiceResult<()> {
    actor.can(AdminCapability::ModerateReviews).check()?;

    if !Review::delete(id, deps.store()).await? {
        return Err(ServiceError::not_found("Review", id));
    }

    info!(review_id = %id, moderator_id = %actor.member_id(), "Review deleted");
    Ok(())
}

/// The moderation queue: every review, decorated with product and author
/// display fields, then filtered, searched and paged.
pub async fn list_reviews_for_moderation(
    query: &ListQuery<ReviewStatus>,
    actor: &Actor,
    deps: &ServerDeps,
) -> ServiceResult<Page<ReviewListing>> {
    actor.can(AdminCapability::ModerateReviews).check()?;

    let reviews = Review::find_all(deps.store()).await?;

    let product_ids: Vec<ProductId> = reviews.iter().map(|r| r.product).collect();
    let author_ids: Vec<MemberId> = reviews.iter().map(|r| r.author).collect();
    let products = deps.catalog.product_summaries(&product_ids).await?;
    let authors = deps.catalog.member_summaries(&author_ids).await?;

    let rows = reviews
        .into_iter()
        .map(|review| {
            let product = products.get(&review.product).cloned();
            let author = authors.get(&review.author).map(|m| m.name.clone());
            ReviewListing::new(
                review,
                product.as_ref().map(|p| p.name.clone()),
                product.and_then(|p| p.image_url),
                author,
            )
        })
        .collect();

    Ok(run_list_query(rows, query))
}
