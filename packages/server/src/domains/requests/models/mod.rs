pub mod service_request;
pub mod status;

pub use service_request::*;
pub use status::*;
