// Business domains
pub mod auth;
pub mod content;
pub mod requests;
pub mod reviews;
pub mod section;
