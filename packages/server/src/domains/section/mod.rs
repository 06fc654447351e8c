//! Section domain - the single persistent marketing section (e.g. the
//! benefits panel) with field-level merge updates

pub mod actions;
pub mod models;

pub use models::{Section, SectionItem, SectionPatch};
