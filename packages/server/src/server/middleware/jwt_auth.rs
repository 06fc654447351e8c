use crate::common::Actor;
use crate::domains::auth::JwtService;
use axum::{middleware::Next, response::Response};
use std::sync::Arc;
use tracing::debug;

/// JWT authentication middleware
///
/// Verifies the bearer token, if any, and adds the caller's `Actor` to the
/// request extensions. Requests without a valid token continue anonymously.
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    match bearer_actor(&request, &jwt_service) {
        Some(actor) => {
            debug!(member_id = %actor.member_id(), is_admin = actor.is_admin(), "Authenticated request");
            request.extensions_mut().insert(actor);
        }
        None => debug!("No valid authentication token"),
    }

    next.run(request).await
}

fn bearer_actor(
    request: &axum::http::Request<axum::body::Body>,
    jwt_service: &JwtService,
) -> Option<Actor> {
    let auth_str = request.headers().get("authorization")?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);
    jwt_service.verify_token(token).ok()
}
