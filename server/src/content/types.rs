//! Content request and response types.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::api::PageParams;
use crate::db::{ContentEntry, ContentKind, ContentPatch};

/// Lowercase words joined by single hyphens.
pub static SLUG_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid regex")
});

fn empty_body() -> Value {
    Value::Object(serde_json::Map::new())
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateContentRequest {
    #[validate(
        length(min = 1, max = 128),
        regex(path = *SLUG_REGEX, message = "lowercase letters, digits and single hyphens")
    )]
    pub slug: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 500))]
    pub summary: Option<String>,
    #[serde(default = "empty_body")]
    pub body: Value,
    /// Publish immediately. Needs the publish capability as well as create.
    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateContentRequest {
    #[validate(
        length(min = 1, max = 128),
        regex(path = *SLUG_REGEX, message = "lowercase letters, digits and single hyphens")
    )]
    pub slug: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 500))]
    pub summary: Option<String>,
    pub body: Option<Value>,
}

impl From<UpdateContentRequest> for ContentPatch {
    fn from(req: UpdateContentRequest) -> Self {
        Self {
            slug: req.slug,
            title: req.title,
            summary: req.summary,
            body: req.body,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub published: bool,
}

/// Query string for list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Only honoured for callers allowed to see unpublished entries.
    pub published: Option<bool>,
    /// Case-insensitive title filter.
    pub q: Option<String>,
}

impl ListQuery {
    #[must_use]
    pub const fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SearchQuery {
    #[validate(length(min = 1, max = 100))]
    pub q: String,
    /// Matches returned per kind.
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<u32>,
    pub published: Option<bool>,
}

/// Compact entry used in search results.
#[derive(Debug, Clone, Serialize)]
pub struct ContentSummary {
    pub id: Uuid,
    pub kind: ContentKind,
    pub slug: String,
    pub title: String,
    pub summary: Option<String>,
    pub published: bool,
}

impl From<ContentEntry> for ContentSummary {
    fn from(entry: ContentEntry) -> Self {
        Self {
            id: entry.id,
            kind: entry.kind,
            slug: entry.slug,
            title: entry.title,
            summary: entry.summary,
            published: entry.published,
        }
    }
}

/// Matches for one content kind.
#[derive(Debug, Serialize)]
pub struct SearchGroup {
    pub total: i64,
    pub entries: Vec<ContentSummary>,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub query: String,
    /// Keyed by collection name (`items`, `guides`, ...).
    pub results: BTreeMap<&'static str, SearchGroup>,
}

#[derive(Debug, Serialize)]
pub struct DeletedContent {
    pub id: Uuid,
    pub kind: ContentKind,
}
