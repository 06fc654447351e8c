// HTTP routes
pub mod content;
pub mod error;
pub mod extract;
pub mod health;
pub mod requests;
pub mod reviews;
pub mod section;

pub use content::*;
pub use error::*;
pub use extract::{JsonBody, QueryParams};
pub use health::*;
pub use requests::*;
pub use reviews::*;
pub use section::*;
