//! Reviews domain - storefront review submissions and their moderation
//!
//! Lifecycle: submitted as Pending, then approved or rejected once by a
//! moderator. Deletion is permitted in any state.

pub mod actions;
pub mod models;

pub use models::{NewReview, Review, ReviewListing, ReviewStatus};
