//! Content Visibility Filter
//!
//! Items, guides, locations and patch notes share one storage shape and one
//! set of handlers. Reads are filtered by publication state; writes are
//! gated per kind by the `<kind>.<op>` capabilities.

mod error;
mod handlers;
mod search;
mod types;
pub mod visibility;

use axum::{
    routing::{get, put},
    Extension, Router,
};

pub use error::ContentError;
pub use types::{
    ContentSummary, CreateContentRequest, ListQuery, PublishRequest, SearchQuery,
    SearchResults, UpdateContentRequest, SLUG_REGEX,
};

use crate::api::AppState;
use crate::db::ContentKind;

/// Content routes, mounted under `/api`.
///
/// Per kind (`items`, `guides`, `locations`, `patches`):
/// - GET /{kind} - List visible entries
/// - POST /{kind} - Create
/// - GET /{kind}/{slug} - Fetch by slug
/// - PATCH /{kind}/{id} - Edit
/// - DELETE /{kind}/{id} - Delete
/// - PUT /{kind}/{id}/publish - Publish or unpublish
///
/// Plus GET /search across all kinds.
pub fn router() -> Router<AppState> {
    ContentKind::all()
        .iter()
        .fold(
            Router::new().route("/search", get(search::search)),
            |router, kind| router.nest(&format!("/{}", kind.collection()), kind_router(*kind)),
        )
}

fn kind_router(kind: ContentKind) -> Router<AppState> {
    // GET reads the segment as a slug; PATCH and DELETE read it as an id
    Router::new()
        .route("/", get(handlers::list).post(handlers::create))
        .route(
            "/{key}",
            get(handlers::get_by_slug)
                .patch(handlers::update)
                .delete(handlers::remove),
        )
        .route("/{key}/publish", put(handlers::set_published))
        .layer(Extension(kind))
}
