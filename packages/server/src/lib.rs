// Storefront content & moderation API - core
//
// This crate provides the backend for the storefront's editable site content,
// the singleton marketing section, and the moderation queues behind the admin
// dashboard (reviews, returns, replacements).
//
// Store access lives in domains/*/models, entry points in domains/*/actions.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
