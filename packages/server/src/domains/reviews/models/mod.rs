pub mod listing;
pub mod review;
pub mod status;

pub use listing::*;
pub use review::*;
pub use status::*;
