//! Test fixtures for seeding the document store.
#![allow(dead_code)]

use serde_json::json;
use storefront_core::common::{Actor, MemberId, ProductId};
use storefront_core::domains::reviews::{actions as review_actions, NewReview, Review};
use storefront_core::kernel::{BaseDocumentStore, MEMBERS_COLLECTION, PRODUCTS_COLLECTION};

use super::TestHarness;

/// Store a catalog product and return its id
pub async fn seed_product(ctx: &TestHarness, name: &str, image_url: Option<&str>) -> ProductId {
    let doc = ctx
        .store
        .insert(
            PRODUCTS_COLLECTION,
            None,
            json!({ "name": name, "imageUrl": image_url }),
        )
        .await
        .expect("Failed to seed product");
    ProductId::from_uuid(doc.id)
}

/// Store a member profile and return a non-admin actor for it
pub async fn seed_customer(ctx: &TestHarness, name: &str) -> Actor {
    let doc = ctx
        .store
        .insert(MEMBERS_COLLECTION, None, json!({ "name": name }))
        .await
        .expect("Failed to seed member");
    Actor::new(MemberId::from_uuid(doc.id), false)
}

pub fn review_input(product: ProductId, rating: i64, comment: &str) -> NewReview {
    NewReview {
        product,
        rating,
        title: None,
        comment: Some(comment.to_string()),
        images: vec![],
    }
}

/// Submit a review through the public action
pub async fn submit_review(
    ctx: &TestHarness,
    author: &Actor,
    product: ProductId,
    rating: i64,
    comment: &str,
) -> Review {
    review_actions::submit_review(review_input(product, rating, comment), Some(author), &ctx.deps)
        .await
        .expect("Failed to submit review")
}
