// Common types and utilities shared across the application

pub mod auth;
pub mod entity_ids;
pub mod errors;
pub mod id;
pub mod pagination;

pub use auth::{Actor, AdminCapability, AuthError};
pub use entity_ids::*;
pub use errors::{ServiceError, ServiceResult};
pub use pagination::{run_list_query, ListParams, ListQuery, Listable, Page, StatusFilter};
