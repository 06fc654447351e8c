//! Mapping from the service error taxonomy to HTTP responses.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::common::{Actor, AuthError, ServiceError};

/// Error returned by every REST handler
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl<E: Into<ServiceError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            ServiceError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "validation_failed", "field": field, "message": message }),
            ),
            ServiceError::NotFound { entity, id } => (
                StatusCode::NOT_FOUND,
                json!({ "error": "not_found", "message": format!("{} {} not found", entity, id) }),
            ),
            ServiceError::InvalidTransition { from, to } => (
                StatusCode::CONFLICT,
                json!({
                    "error": "invalid_transition",
                    "message": format!("cannot move from {} to {}", from, to),
                    "from": from,
                    "to": to,
                }),
            ),
            ServiceError::Unauthorized(AuthError::AuthenticationRequired) => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "unauthenticated", "message": self.0.to_string() }),
            ),
            ServiceError::Unauthorized(AuthError::AdminRequired(_)) => (
                StatusCode::FORBIDDEN,
                json!({ "error": "forbidden", "message": self.0.to_string() }),
            ),
            ServiceError::Integrity(_) | ServiceError::Store(_) => {
                tracing::error!(error = %self.0, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal", "message": "internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// The calling principal, or 401 when the request carried no valid token.
pub fn require_actor(auth: Option<Extension<Actor>>) -> ApiResult<Actor> {
    auth.map(|Extension(actor)| actor)
        .ok_or_else(|| ApiError(AuthError::AuthenticationRequired.into()))
}
