//! API Router and Application State
//!
//! Central routing configuration and shared state.

mod extract;

use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use serde::Serialize;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub use extract::{ApiJson, ApiPath, ApiQuery, PageParams};

use crate::{access, admin, auth, config::Config, content, db::Store, settings};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Storage port
    pub store: Arc<dyn Store>,
    /// Server configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let cors = match &state.config.cors_origins {
        Some(origins) => CorsLayer::new().allow_origin(AllowOrigin::list(
            origins.iter().filter_map(|o| o.parse().ok()),
        )),
        None => CorsLayer::new().allow_origin(Any),
    }
    .allow_methods(Any)
    .allow_headers(Any);

    let api = Router::new()
        .merge(content::router())
        .nest("/settings", settings::router())
        .nest("/admin", admin::router());

    // Every /api route sees the resolved actor (or none)
    let api_routes = Router::new()
        .nest("/api", api)
        .layer(from_fn_with_state(state.clone(), access::resolve_actor));

    Router::new()
        .route("/health", get(health_check))
        .nest("/auth", auth::router(state.clone()))
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
    version: &'static str,
}

/// Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
