//! Cross-kind search.

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use validator::Validate;
use wiki_common::ApiResponse;

use super::types::{SearchGroup, SearchQuery, SearchResults};
use super::visibility::published_filter;
use crate::access::Viewer;
use crate::api::{ApiQuery, AppState};
use crate::db::{ContentKind, ContentQuery};
use crate::error::{ApiError, ApiResult};

const DEFAULT_PER_KIND: u32 = 5;

/// GET /api/search?q=
///
/// Title search over every content kind, filtered by the same visibility
/// rules as the list endpoints.
#[tracing::instrument(skip(state, viewer))]
pub async fn search(
    State(state): State<AppState>,
    viewer: Viewer,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ApiResult<Json<ApiResponse<SearchResults>>> {
    let term = query.q.trim().to_string();
    if term.is_empty() {
        return Err(ApiError::validation("Search query must not be blank"));
    }
    query.validate()?;

    let limit = i64::from(query.limit.unwrap_or(DEFAULT_PER_KIND));
    let published = published_filter(&viewer, query.published);

    let mut results = BTreeMap::new();
    for kind in ContentKind::all() {
        let (entries, total) = state
            .store
            .list_content(&ContentQuery {
                kind: *kind,
                published,
                search: Some(term.clone()),
                limit,
                offset: 0,
            })
            .await?;

        results.insert(
            kind.collection(),
            SearchGroup {
                total,
                entries: entries.into_iter().map(Into::into).collect(),
            },
        );
    }

    Ok(Json(ApiResponse::ok(SearchResults {
        query: term,
        results,
    })))
}
