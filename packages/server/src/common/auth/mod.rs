/// Authorization module for the storefront admin surface
///
/// Provides a fluent API for authorization checks in actions:
///
/// ```rust,ignore
/// use crate::common::auth::{Actor, AdminCapability};
///
/// Actor::new(member_id, is_admin)
///     .can(AdminCapability::ModerateReviews)
///     .check()?;
/// ```
///
/// Authentication itself happens upstream (JWT middleware); actions only see
/// the resulting principal.

mod builder;
mod capability;
mod errors;

pub use builder::{Actor, CapabilityBuilder};
pub use capability::AdminCapability;
pub use errors::AuthError;
