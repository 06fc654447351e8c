// HTTP server setup (Axum + REST)
pub mod app;
pub mod middleware;
pub mod routes;

pub use app::*;
