//! User Administration
//!
//! Staff endpoints for account management and the audit trail:
//! - Moderator and above: list and inspect users, read the audit log
//! - Admin and above: change roles, activate or deactivate accounts
//! - Founder: hard delete

pub mod handlers;
pub mod types;

use axum::{
    middleware::from_fn,
    routing::{get, put},
    Router,
};

pub use types::AdminError;

use crate::access::require;
use crate::api::AppState;
use crate::permissions::Requirement;

/// Create the admin router, mounted under `/api/admin`.
///
/// Every route needs at least a moderator. Handlers then check the specific
/// capability, so a moderator whose role document lacks `roles.view` still
/// gets 403 on `/roles`.
pub fn router() -> Router<AppState> {
    let manage_routes = Router::new()
        .route("/users/{id}/role", put(handlers::update_user_role))
        .route("/users/{id}/status", put(handlers::update_user_status))
        .layer(from_fn(require(Requirement::admin_or_above())));

    Router::new()
        .route("/roles", get(handlers::list_roles))
        .route("/users", get(handlers::list_users))
        .route(
            "/users/{id}",
            get(handlers::get_user).delete(handlers::delete_user),
        )
        .route("/audit-log", get(handlers::get_audit_log))
        .merge(manage_routes)
        .layer(from_fn(require(Requirement::moderator_or_above())))
}
