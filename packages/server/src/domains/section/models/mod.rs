pub mod items;
pub mod section;

pub use items::*;
pub use section::*;
