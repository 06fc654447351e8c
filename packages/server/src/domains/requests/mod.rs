//! Requests domain - customer return and replacement requests
//!
//! Each request is worked through its own small status machine and shows up
//! in the admin queue for its kind.

pub mod actions;
pub mod models;

pub use models::{NewServiceRequest, RequestKind, RequestStatus, ServiceRequest, ServiceRequestListing};
