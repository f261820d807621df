//! Identity & Session
//!
//! Local accounts with Argon2id password hashes and HS256 session tokens.

mod error;
mod handlers;
pub mod jwt;
mod password;
mod service;
mod types;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};

pub use error::{AuthError, AuthResult};
pub use password::{hash_password, verify_password};
pub use service::{actor_from_token, authenticate, register};
pub use types::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest, UserProfile};

use crate::access::{require, resolve_actor};
use crate::api::AppState;
use crate::permissions::Requirement;

/// Create authentication router.
///
/// Public routes (any `Authorization` header is ignored, so a client holding
/// an expired token can still log in):
/// - POST /register - Register a new user
/// - POST /login - Exchange credentials for a session token
///
/// Authenticated routes:
/// - GET /me - Current user profile
/// - PATCH /me - Update own email
pub fn router(state: AppState) -> Router<AppState> {
    let self_routes = Router::new()
        .route("/me", get(handlers::me).patch(handlers::update_me))
        .layer(from_fn(require(Requirement::Authenticated)))
        .layer(from_fn_with_state(state, resolve_actor));

    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .merge(self_routes)
}
