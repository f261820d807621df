//! Storage Port
//!
//! Repository traits the rest of the server talks to. Handlers receive an
//! `Arc<dyn Store>` through `AppState`; production wires in [`super::PgStore`],
//! tests wire in [`super::MemoryStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::models::{
    AuditLogEntry, ContentEntry, ContentKind, ContentPatch, ContentQuery, NewAuditEntry,
    NewContent, NewRole, NewSetting, NewUser, Role, SiteSetting, User,
};

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write. Carries the offending field.
    #[error("{0} already exists")]
    Conflict(&'static str),

    /// Referenced row is missing (e.g. unknown role id on insert).
    #[error("Referenced {0} does not exist")]
    MissingReference(&'static str),

    /// Database error.
    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Role registry persistence.
#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn find_role_by_name(&self, name: &str) -> StoreResult<Option<Role>>;

    async fn find_role_by_id(&self, id: Uuid) -> StoreResult<Option<Role>>;

    /// All roles, highest priority first.
    async fn list_roles(&self) -> StoreResult<Vec<Role>>;

    /// Insert or update a role by name.
    async fn upsert_role(&self, role: NewRole) -> StoreResult<Role>;
}

/// User account persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. Fails with `Conflict("username" | "email")` on duplicates.
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// One page of users, newest first, plus the total count.
    async fn list_users(&self, limit: i64, offset: i64) -> StoreResult<(Vec<User>, i64)>;

    /// Bump `last_login_at` and `login_count`.
    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<()>;

    async fn update_user_email(&self, id: Uuid, email: &str) -> StoreResult<Option<User>>;

    async fn set_user_role(&self, id: Uuid, role_id: Uuid) -> StoreResult<Option<User>>;

    async fn set_user_active(&self, id: Uuid, is_active: bool) -> StoreResult<Option<User>>;

    /// Returns `true` if a row was deleted.
    async fn delete_user(&self, id: Uuid) -> StoreResult<bool>;

    async fn count_users_with_role(&self, role_id: Uuid) -> StoreResult<i64>;
}

/// Site setting persistence.
#[async_trait]
pub trait SettingStore: Send + Sync {
    /// All settings ordered by category, then key.
    async fn list_settings(&self) -> StoreResult<Vec<SiteSetting>>;

    async fn find_setting(&self, key: &str) -> StoreResult<Option<SiteSetting>>;

    async fn update_setting_value(
        &self,
        key: &str,
        value: &str,
        updated_by: Uuid,
    ) -> StoreResult<Option<SiteSetting>>;

    /// Insert a setting if its key is absent. Existing values are kept.
    async fn insert_setting_if_missing(&self, setting: NewSetting) -> StoreResult<()>;
}

/// Wiki content persistence.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// One page of entries, newest first, plus the total count for the filter.
    async fn list_content(&self, query: &ContentQuery) -> StoreResult<(Vec<ContentEntry>, i64)>;

    async fn find_content_by_slug(
        &self,
        kind: ContentKind,
        slug: &str,
    ) -> StoreResult<Option<ContentEntry>>;

    async fn find_content_by_id(
        &self,
        kind: ContentKind,
        id: Uuid,
    ) -> StoreResult<Option<ContentEntry>>;

    /// Insert an entry. Fails with `Conflict("slug")` when the slug is taken for the kind.
    async fn create_content(&self, content: NewContent) -> StoreResult<ContentEntry>;

    async fn update_content(
        &self,
        kind: ContentKind,
        id: Uuid,
        patch: ContentPatch,
    ) -> StoreResult<Option<ContentEntry>>;

    async fn set_content_published(
        &self,
        kind: ContentKind,
        id: Uuid,
        published: bool,
    ) -> StoreResult<Option<ContentEntry>>;

    /// Returns `true` if a row was deleted.
    async fn delete_content(&self, kind: ContentKind, id: Uuid) -> StoreResult<bool>;
}

/// Append-only audit ledger.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn append_audit(&self, entry: NewAuditEntry) -> StoreResult<AuditLogEntry>;

    /// One page of entries, newest first. `action_prefix` filters by action prefix.
    async fn list_audit(
        &self,
        limit: i64,
        offset: i64,
        action_prefix: Option<&str>,
    ) -> StoreResult<(Vec<AuditLogEntry>, i64)>;
}

/// Everything the server needs from storage.
pub trait Store: RoleStore + UserStore + SettingStore + ContentStore + AuditStore {}

impl<T> Store for T where T: RoleStore + UserStore + SettingStore + ContentStore + AuditStore {}
