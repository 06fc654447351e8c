//! Auth domain - verification of tokens issued by the storefront login service
//!
//! Sign-in itself lives outside this crate; requests arrive with a bearer
//! token and the middleware turns it into an `Actor`.

pub mod jwt;

pub use jwt::{Claims, JwtService};
