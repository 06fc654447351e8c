use thiserror::Error;

use super::AdminCapability;

/// Authorization errors for the storefront admin surface
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Admin access required for {0}")]
    AdminRequired(AdminCapability),
}
