//! Kernel module - server infrastructure and dependencies.

pub mod catalog;
pub mod deps;
pub mod document_store;
pub mod test_dependencies;
pub mod traits;

pub use catalog::{DocumentCatalogLookup, MEMBERS_COLLECTION, PRODUCTS_COLLECTION};
pub use deps::ServerDeps;
pub use document_store::PostgresDocumentStore;
pub use test_dependencies::{
    InMemoryDocumentStore, TestDependencies, TEST_JWT_ISSUER, TEST_JWT_SECRET,
};
pub use traits::*;
