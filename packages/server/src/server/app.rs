//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{
    delete_content_handler, delete_review_handler, get_content_handler, get_section_handler,
    health_handler, list_content_handler, list_queue_handler, list_reviews_handler,
    put_content_handler, set_request_status_handler, set_review_status_handler,
    submit_request_handler, submit_review_handler, update_section_handler,
};

/// Requests taking longer than this are answered with 408
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}

/// Build the Axum application router
///
/// An empty `allowed_origins` list allows any origin.
pub fn build_app(deps: ServerDeps, allowed_origins: &[String]) -> Router {
    let jwt_service = deps.jwt_service.clone();
    let state = AppState {
        deps: Arc::new(deps),
    };

    let api = Router::new()
        .route("/content", get(list_content_handler))
        .route(
            "/content/:key",
            get(get_content_handler)
                .put(put_content_handler)
                .delete(delete_content_handler),
        )
        .route("/section", get(get_section_handler).patch(update_section_handler))
        .route("/reviews", post(submit_review_handler))
        .route("/requests", post(submit_request_handler))
        .route("/admin/reviews", get(list_reviews_handler))
        .route("/admin/reviews/:id", axum::routing::delete(delete_review_handler))
        .route("/admin/reviews/:id/status", patch(set_review_status_handler))
        // Both request routes share the `:id` segment name; the queue route
        // reads it as the queue kind.
        .route("/admin/requests/:id", get(list_queue_handler))
        .route("/admin/requests/:id/status", patch(set_request_status_handler));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api)
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), req, next)
        }))
        .layer(Extension(state))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}
