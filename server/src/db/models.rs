//! Database Models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Role model.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub display_name: String,
    pub priority: i32,
    pub permissions: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Role definition used for seeding.
#[derive(Debug, Clone)]
pub struct NewRole {
    pub name: String,
    pub display_name: String,
    pub priority: i32,
    pub permissions: serde_json::Value,
}

/// User model.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role_id: Uuid,
    pub is_active: bool,
    pub is_premium: bool,
    pub email_verified: bool,
    pub login_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Data for inserting a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: Uuid,
}

/// Minimum role required to touch a site setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "setting_access_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SettingAccessLevel {
    Admin,
    Founder,
}

/// Runtime-mutable site setting.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SiteSetting {
    pub key: String,
    pub value: String,
    pub category: String,
    pub access_level: SettingAccessLevel,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

/// Setting definition used for seeding.
#[derive(Debug, Clone)]
pub struct NewSetting {
    pub key: String,
    pub value: String,
    pub category: String,
    pub access_level: SettingAccessLevel,
}

/// Kind of curated wiki content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "content_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Item,
    Guide,
    Location,
    Patch,
}

impl ContentKind {
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Item, Self::Guide, Self::Location, Self::Patch]
    }

    /// Singular name, used in audit entries and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Guide => "guide",
            Self::Location => "location",
            Self::Patch => "patch",
        }
    }

    /// Collection name, used as the route segment and permission namespace.
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Item => "items",
            Self::Guide => "guides",
            Self::Location => "locations",
            Self::Patch => "patches",
        }
    }

    /// Capitalized name for user-facing messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Item => "Item",
            Self::Guide => "Guide",
            Self::Location => "Location",
            Self::Patch => "Patch",
        }
    }
}

/// Item, guide, location or patch note.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ContentEntry {
    pub id: Uuid,
    pub kind: ContentKind,
    pub slug: String,
    pub title: String,
    pub summary: Option<String>,
    pub body: serde_json::Value,
    pub published: bool,
    pub author_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for inserting a content entry.
#[derive(Debug, Clone)]
pub struct NewContent {
    pub kind: ContentKind,
    pub slug: String,
    pub title: String,
    pub summary: Option<String>,
    pub body: serde_json::Value,
    pub published: bool,
    pub author_id: Option<Uuid>,
}

/// Partial update of a content entry. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ContentPatch {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub body: Option<serde_json::Value>,
}

/// Listing filter for content queries.
#[derive(Debug, Clone)]
pub struct ContentQuery {
    pub kind: ContentKind,
    /// `Some(b)` keeps only rows with `published == b`; `None` keeps all rows.
    pub published: Option<bool>,
    /// Case-insensitive title substring.
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

/// System audit log entry.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub action: String,
    pub entity: String,
    pub entity_id: Option<String>,
    pub changes: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Data for appending an audit entry.
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub user_id: Option<Uuid>,
    pub action: String,
    pub entity: String,
    pub entity_id: Option<String>,
    pub changes: Option<serde_json::Value>,
}
