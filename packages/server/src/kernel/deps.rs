//! Server dependencies for actions (using traits for testability)
//!
//! This module provides the central dependency container used by every
//! domain action. External systems sit behind trait objects so tests can
//! swap in the in-memory store.

use std::sync::Arc;

use crate::domains::auth::JwtService;
use crate::kernel::{BaseCatalogLookup, BaseDocumentStore};

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to actions
#[derive(Clone)]
pub struct ServerDeps {
    /// The external document database; the only shared resource
    pub store: Arc<dyn BaseDocumentStore>,
    /// Product/member display fields for admin listings
    pub catalog: Arc<dyn BaseCatalogLookup>,
    /// JWT service for token verification
    pub jwt_service: Arc<JwtService>,
}

impl ServerDeps {
    pub fn new(
        store: Arc<dyn BaseDocumentStore>,
        catalog: Arc<dyn BaseCatalogLookup>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            store,
            catalog,
            jwt_service,
        }
    }

    /// Convenience accessor used throughout the models
    pub fn store(&self) -> &dyn BaseDocumentStore {
        self.store.as_ref()
    }
}
