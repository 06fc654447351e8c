//! Typed ID definitions for all domain entities.
//!
//! Cross-entity references (a review's author and product, a request's
//! customer) are stored as these opaque ids, never as embedded records.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for storefront members (customers, moderators).
pub struct Member;

/// Marker type for catalog products.
pub struct Product;

/// Marker type for product reviews.
pub struct Review;

/// Marker type for return/replacement requests.
pub struct ServiceRequest;

/// Marker type for items of the singleton section.
pub struct SectionItem;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

pub type MemberId = Id<Member>;

pub type ProductId = Id<Product>;

pub type ReviewId = Id<Review>;

pub type RequestId = Id<ServiceRequest>;

pub type SectionItemId = Id<SectionItem>;
