//! Content domain - keyed site copy and settings addressed by slug

pub mod actions;
pub mod models;

pub use models::{ContentBlock, ContentFields};
