//! Request extractors that reject with the service's validation error.
//!
//! axum's own `Json` and `Query` reject with plain-text 4xx bodies; these
//! wrappers turn the same failures into a 400 naming the offending field.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::error::ApiError;
use crate::common::ServiceError;

/// JSON request body decoded into `T`
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ServiceError::validation("body", rejection.body_text()))?;

        Ok(JsonBody(decode_body(value)?))
    }
}

/// Query string decoded into `T`
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ServiceError::validation("query", rejection.body_text()))?;
        Ok(QueryParams(params))
    }
}

/// Decode a JSON body, blaming the first top-level field that cannot be read.
pub fn decode_body<T: DeserializeOwned>(value: Value) -> Result<T, ServiceError> {
    let err = match serde_json::from_value::<T>(value.clone()) {
        Ok(decoded) => return Ok(decoded),
        Err(err) => err,
    };

    let Value::Object(fields) = value else {
        return Err(ServiceError::validation("body", err.to_string()));
    };

    // Derived impls reject a bad value on sight and report missing fields
    // last, so a lone field fails with anything else only if its value is bad.
    for (name, field) in &fields {
        let single = Value::Object(Map::from_iter([(name.clone(), field.clone())]));
        if let Err(field_err) = serde_json::from_value::<T>(single) {
            if missing_field(&field_err).is_none() {
                return Err(ServiceError::validation(name.as_str(), field_err.to_string()));
            }
        }
    }

    match missing_field(&err) {
        Some(name) => Err(ServiceError::validation(name, "is required")),
        None => Err(ServiceError::validation("body", err.to_string())),
    }
}

/// The field named by serde's "missing field `x`" error
fn missing_field(err: &serde_json::Error) -> Option<String> {
    let message = err.to_string();
    let rest = message.strip_prefix("missing field `")?;
    rest.split('`').next().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    #[allow(dead_code)]
    struct Submission {
        rating: i64,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        is_active: Option<bool>,
    }

    fn blamed(body: Value) -> String {
        match decode_body::<Submission>(body).unwrap_err() {
            ServiceError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_well_formed_body_decodes() {
        let decoded: Submission = decode_body(json!({"rating": 4, "title": "Nice"})).unwrap();
        assert_eq!(decoded.rating, 4);
    }

    #[test]
    fn test_wrong_type_names_the_field() {
        assert_eq!(blamed(json!({"rating": 4.5})), "rating");
        assert_eq!(blamed(json!({"rating": "5"})), "rating");
        assert_eq!(blamed(json!({"rating": 5, "title": 5})), "title");
        assert_eq!(blamed(json!({"rating": 5, "isActive": "false"})), "isActive");
    }

    #[test]
    fn test_bad_value_is_blamed_before_a_missing_field() {
        assert_eq!(blamed(json!({"title": 5})), "title");
    }

    #[test]
    fn test_missing_required_field_is_named() {
        match decode_body::<Submission>(json!({"title": "Nice"})).unwrap_err() {
            ServiceError::Validation { field, message } => {
                assert_eq!(field, "rating");
                assert_eq!(message, "is required");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_object_body_blames_the_body() {
        assert_eq!(blamed(json!([1, 2, 3])), "body");
    }
}
