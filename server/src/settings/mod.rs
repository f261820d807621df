//! Site Settings
//!
//! Runtime key/value configuration. Each setting carries an access level:
//! `founder` settings are readable and writable only by the founder.

mod defaults;
mod handlers;

use axum::{middleware::from_fn, routing::get, Router};

pub use defaults::seed_settings;
pub use handlers::{SettingsError, UpdateSettingRequest, PUBLIC_CATEGORIES};

use crate::access::require;
use crate::api::AppState;
use crate::permissions::Requirement;

/// Settings routes, mounted under `/api/settings`.
///
/// - GET /public - Public and analytics values (anyone)
/// - GET / - All settings visible to the caller (admin or above)
/// - GET /{key} - One setting (admin or above)
/// - PUT /{key} - Update (admin or above; founder for founder-level)
pub fn router() -> Router<AppState> {
    let admin_routes = Router::new()
        .route("/", get(handlers::list_settings))
        .route(
            "/{key}",
            get(handlers::get_setting).put(handlers::update_setting),
        )
        .layer(from_fn(require(Requirement::admin_or_above())));

    Router::new()
        .route("/public", get(handlers::public_settings))
        .merge(admin_routes)
}
