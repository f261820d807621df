//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for building and sending requests through the full axum
//! router over an in-memory store, plus utilities for creating users with a
//! given role and minting session tokens.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{self, header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;
use wiki_common::RoleName;
use wiki_server::api::{create_router, AppState};
use wiki_server::auth::{hash_password, jwt};
use wiki_server::bootstrap;
use wiki_server::config::Config;
use wiki_server::db::{AuditStore, MemoryStore, NewUser, UserStore};
use wiki_server::roles::resolve_role;

/// Password given to every helper-created user.
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// A user created through [`TestApp::create_user`].
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub token: String,
}

// ============================================================================
// Test App
// ============================================================================

/// A test application wrapping the full axum router.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub config: Arc<Config>,
}

impl TestApp {
    /// Create a new test app with roles and settings seeded.
    pub async fn new() -> Self {
        Self::with_config(Config::default_for_test()).await
    }

    /// Create a test app with a custom config.
    pub async fn with_config(config: Config) -> Self {
        let store = Arc::new(MemoryStore::new());
        bootstrap::run(&*store, &config)
            .await
            .expect("Failed to seed test store");

        let state = AppState::new(store.clone(), config.clone());
        let router = create_router(state);

        Self {
            router,
            store,
            config: Arc::new(config),
        }
    }

    /// Build an HTTP request with the given method and URI.
    pub fn request(method: Method, uri: &str) -> http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    /// Send a request through the router via `tower::ServiceExt::oneshot`.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot request failed")
    }

    /// Send a request and decode the JSON body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Self::request(method, uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self.oneshot(request).await;
        let status = response.status();
        (status, body_to_json(response).await)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    /// Create an active user holding `role` and return it with a session token.
    pub async fn create_user(&self, username: &str, role: RoleName) -> TestUser {
        let role = resolve_role(&*self.store, role)
            .await
            .expect("Role should be seeded");
        let password_hash =
            hash_password(TEST_PASSWORD, self.config.password_hash_cost).expect("hash");
        let user = self
            .store
            .create_user(NewUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password_hash,
                role_id: role.id,
            })
            .await
            .expect("Failed to create test user");

        TestUser {
            id: user.id,
            username: user.username.clone(),
            token: self.token_for(user.id, &user.username),
        }
    }

    /// Mint a session token for a user.
    pub fn token_for(&self, user_id: Uuid, username: &str) -> String {
        jwt::issue_token(
            user_id,
            username,
            &self.config.jwt_secret,
            self.config.jwt_expiry,
        )
        .expect("Failed to issue token")
    }

    /// Number of audit rows, optionally filtered by action prefix.
    pub async fn audit_count(&self, action_prefix: Option<&str>) -> i64 {
        let (_, total) = self
            .store
            .list_audit(1, 0, action_prefix)
            .await
            .expect("Failed to read audit log");
        total
    }
}

/// Collect a response body and parse it as JSON.
pub async fn body_to_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("Response body is not JSON")
}

/// The `error.code` of a failure envelope.
pub fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}
