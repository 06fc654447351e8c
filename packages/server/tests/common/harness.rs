//! Test harness for integration testing.
#![allow(dead_code)]
//!
//! Every test gets a fresh in-memory document store wired into the same
//! `ServerDeps` and router the server builds, so actions and HTTP handlers
//! are exercised end to end without external services.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use storefront_core::common::{Actor, MemberId};
use jsonwebtoken::{encode, EncodingKey, Header};
use storefront_core::domains::auth::{Claims, JwtService};
use storefront_core::kernel::{
    InMemoryDocumentStore, ServerDeps, TestDependencies, TEST_JWT_ISSUER, TEST_JWT_SECRET,
};
use storefront_core::server::build_app;
use test_context::AsyncTestContext;
use tower::ServiceExt;

fn init_tracing() {
    // Run tests with: RUST_LOG=debug cargo test -- --nocapture
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Test harness that owns one isolated store.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let admin = ctx.admin();
///     // ... call actions with &ctx.deps
/// }
/// ```
pub struct TestHarness {
    /// The in-memory store, for seeding and inspecting raw documents
    pub store: Arc<InMemoryDocumentStore>,
    pub jwt_service: Arc<JwtService>,
    /// Dependencies handed to actions
    pub deps: ServerDeps,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new()
    }

    async fn teardown(self) {
        // Store is dropped with the harness
    }
}

impl TestHarness {
    pub fn new() -> Self {
        init_tracing();

        let test_deps = TestDependencies::new();
        let store = test_deps.store.clone();
        let jwt_service = test_deps.jwt_service.clone();

        Self {
            store,
            jwt_service,
            deps: test_deps.into_server_deps(),
        }
    }

    /// A dashboard admin holding every capability
    pub fn admin(&self) -> Actor {
        Actor::new(MemberId::new(), true)
    }

    /// A signed-in storefront customer
    pub fn shopper(&self) -> Actor {
        Actor::new(MemberId::new(), false)
    }

    /// Bearer token for an actor, signed the way the login service signs
    pub fn token_for(&self, actor: &Actor) -> String {
        let claims = Claims {
            sub: actor.member_id().to_string(),
            is_admin: actor.is_admin(),
            exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp(),
            iss: TEST_JWT_ISSUER.to_string(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
        )
        .expect("Failed to sign test token")
    }

    /// The router the server runs, over this harness's store
    pub fn app(&self) -> Router {
        build_app(self.deps.clone(), &[])
    }

    /// Send one request through the router and decode the JSON reply.
    ///
    /// Returns `Value::Null` when the body is empty or not JSON.
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Self::request(method, uri, token);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.dispatch(request).await
    }

    /// Send a raw JSON-typed body, for payloads that are not valid JSON
    pub async fn send_text(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: &str,
    ) -> (StatusCode, Value) {
        let request = Self::request(method, uri, token)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");

        self.dispatch(request).await
    }

    fn request(method: &str, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match token {
            Some(token) => builder.header("authorization", format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .app()
            .oneshot(request)
            .await
            .expect("Router failed to respond");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, json)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
