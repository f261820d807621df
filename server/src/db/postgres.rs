//! `PostgreSQL` implementation of the storage port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{
    AuditLogEntry, ContentEntry, ContentKind, ContentPatch, ContentQuery, NewAuditEntry,
    NewContent, NewRole, NewSetting, NewUser, Role, SiteSetting, User,
};
use super::store::{
    AuditStore, ContentStore, RoleStore, SettingStore, StoreError, StoreResult, UserStore,
};

const USER_COLUMNS: &str = "id, username, email, password_hash, role_id, is_active, is_premium, \
     email_verified, login_count, created_at, updated_at, last_login_at";

const CONTENT_COLUMNS: &str =
    "id, kind, slug, title, summary, body, published, author_id, created_at, updated_at";

const SETTING_COLUMNS: &str = "key, value, category, access_level, updated_by, updated_at";

const AUDIT_COLUMNS: &str = "id, user_id, action, entity, entity_id, changes, created_at";

/// Store backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Translate constraint violations into [`StoreError`] variants.
fn map_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            let field = match db_err.constraint() {
                Some("users_username_key") => "username",
                Some("users_email_key") => "email",
                Some("content_entries_kind_slug_key") => "slug",
                Some("roles_name_key") => "role",
                _ => "record",
            };
            return StoreError::Conflict(field);
        }
        if db_err.is_foreign_key_violation() {
            return StoreError::MissingReference("role");
        }
    }
    StoreError::Database(err)
}

/// Escape `LIKE` wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// ============================================================================
// Roles
// ============================================================================

#[async_trait]
impl RoleStore for PgStore {
    async fn find_role_by_name(&self, name: &str) -> StoreResult<Option<Role>> {
        Ok(sqlx::query_as::<_, Role>(
            "SELECT id, name, display_name, priority, permissions, created_at FROM roles WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_role_by_id(&self, id: Uuid) -> StoreResult<Option<Role>> {
        Ok(sqlx::query_as::<_, Role>(
            "SELECT id, name, display_name, priority, permissions, created_at FROM roles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_roles(&self) -> StoreResult<Vec<Role>> {
        Ok(sqlx::query_as::<_, Role>(
            "SELECT id, name, display_name, priority, permissions, created_at FROM roles ORDER BY priority DESC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn upsert_role(&self, role: NewRole) -> StoreResult<Role> {
        sqlx::query_as::<_, Role>(
            r"
            INSERT INTO roles (id, name, display_name, priority, permissions)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name) DO UPDATE
            SET display_name = EXCLUDED.display_name,
                priority = EXCLUDED.priority,
                permissions = EXCLUDED.permissions
            RETURNING id, name, display_name, priority, permissions, created_at
            ",
        )
        .bind(Uuid::now_v7())
        .bind(&role.name)
        .bind(&role.display_name)
        .bind(role.priority)
        .bind(&role.permissions)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }
}

// ============================================================================
// Users
// ============================================================================

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        sqlx::query_as::<_, User>(&format!(
            r"
            INSERT INTO users (id, username, email, password_hash, role_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(Uuid::now_v7())
        .bind(&user.username)
        .bind(user.email.to_lowercase())
        .bind(&user.password_hash)
        .bind(user.role_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.to_lowercase())
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_users(&self, limit: i64, offset: i64) -> StoreResult<(Vec<User>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((users, total))
    }

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<()> {
        sqlx::query(
            "UPDATE users SET last_login_at = $2, login_count = login_count + 1 WHERE id = $1",
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_user_email(&self, id: Uuid, email: &str) -> StoreResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET email = $2, email_verified = FALSE, updated_at = NOW() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(email.to_lowercase())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn set_user_role(&self, id: Uuid, role_id: Uuid) -> StoreResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET role_id = $2, updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(role_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn set_user_active(&self, id: Uuid, is_active: bool) -> StoreResult<Option<User>> {
        Ok(sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET is_active = $2, updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_users_with_role(&self, role_id: Uuid) -> StoreResult<i64> {
        Ok(
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role_id = $1")
                .bind(role_id)
                .fetch_one(&self.pool)
                .await?,
        )
    }
}

// ============================================================================
// Settings
// ============================================================================

#[async_trait]
impl SettingStore for PgStore {
    async fn list_settings(&self) -> StoreResult<Vec<SiteSetting>> {
        Ok(sqlx::query_as::<_, SiteSetting>(&format!(
            "SELECT {SETTING_COLUMNS} FROM site_settings ORDER BY category, key"
        ))
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_setting(&self, key: &str) -> StoreResult<Option<SiteSetting>> {
        Ok(sqlx::query_as::<_, SiteSetting>(&format!(
            "SELECT {SETTING_COLUMNS} FROM site_settings WHERE key = $1"
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn update_setting_value(
        &self,
        key: &str,
        value: &str,
        updated_by: Uuid,
    ) -> StoreResult<Option<SiteSetting>> {
        Ok(sqlx::query_as::<_, SiteSetting>(&format!(
            "UPDATE site_settings SET value = $2, updated_by = $3, updated_at = NOW() \
             WHERE key = $1 RETURNING {SETTING_COLUMNS}"
        ))
        .bind(key)
        .bind(value)
        .bind(updated_by)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert_setting_if_missing(&self, setting: NewSetting) -> StoreResult<()> {
        sqlx::query(
            r"
            INSERT INTO site_settings (key, value, category, access_level)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (key) DO NOTHING
            ",
        )
        .bind(&setting.key)
        .bind(&setting.value)
        .bind(&setting.category)
        .bind(setting.access_level)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

// ============================================================================
// Content
// ============================================================================

#[async_trait]
impl ContentStore for PgStore {
    async fn list_content(&self, query: &ContentQuery) -> StoreResult<(Vec<ContentEntry>, i64)> {
        let pattern = query.search.as_deref().map(escape_like);

        let total: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM content_entries
            WHERE kind = $1
              AND ($2::bool IS NULL OR published = $2)
              AND ($3::text IS NULL OR title ILIKE '%' || $3 || '%' ESCAPE '\')
            ",
        )
        .bind(query.kind)
        .bind(query.published)
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await?;

        let entries = sqlx::query_as::<_, ContentEntry>(&format!(
            r"
            SELECT {CONTENT_COLUMNS} FROM content_entries
            WHERE kind = $1
              AND ($2::bool IS NULL OR published = $2)
              AND ($3::text IS NULL OR title ILIKE '%' || $3 || '%' ESCAPE '\')
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "
        ))
        .bind(query.kind)
        .bind(query.published)
        .bind(pattern.as_deref())
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((entries, total))
    }

    async fn find_content_by_slug(
        &self,
        kind: ContentKind,
        slug: &str,
    ) -> StoreResult<Option<ContentEntry>> {
        Ok(sqlx::query_as::<_, ContentEntry>(&format!(
            "SELECT {CONTENT_COLUMNS} FROM content_entries WHERE kind = $1 AND slug = $2"
        ))
        .bind(kind)
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_content_by_id(
        &self,
        kind: ContentKind,
        id: Uuid,
    ) -> StoreResult<Option<ContentEntry>> {
        Ok(sqlx::query_as::<_, ContentEntry>(&format!(
            "SELECT {CONTENT_COLUMNS} FROM content_entries WHERE kind = $1 AND id = $2"
        ))
        .bind(kind)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn create_content(&self, content: NewContent) -> StoreResult<ContentEntry> {
        sqlx::query_as::<_, ContentEntry>(&format!(
            r"
            INSERT INTO content_entries (id, kind, slug, title, summary, body, published, author_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {CONTENT_COLUMNS}
            "
        ))
        .bind(Uuid::now_v7())
        .bind(content.kind)
        .bind(&content.slug)
        .bind(&content.title)
        .bind(content.summary.as_deref())
        .bind(&content.body)
        .bind(content.published)
        .bind(content.author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn update_content(
        &self,
        kind: ContentKind,
        id: Uuid,
        patch: ContentPatch,
    ) -> StoreResult<Option<ContentEntry>> {
        sqlx::query_as::<_, ContentEntry>(&format!(
            r"
            UPDATE content_entries
            SET slug = COALESCE($3, slug),
                title = COALESCE($4, title),
                summary = COALESCE($5, summary),
                body = COALESCE($6, body),
                updated_at = NOW()
            WHERE kind = $1 AND id = $2
            RETURNING {CONTENT_COLUMNS}
            "
        ))
        .bind(kind)
        .bind(id)
        .bind(patch.slug.as_deref())
        .bind(patch.title.as_deref())
        .bind(patch.summary.as_deref())
        .bind(patch.body.as_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn set_content_published(
        &self,
        kind: ContentKind,
        id: Uuid,
        published: bool,
    ) -> StoreResult<Option<ContentEntry>> {
        Ok(sqlx::query_as::<_, ContentEntry>(&format!(
            "UPDATE content_entries SET published = $3, updated_at = NOW() \
             WHERE kind = $1 AND id = $2 RETURNING {CONTENT_COLUMNS}"
        ))
        .bind(kind)
        .bind(id)
        .bind(published)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_content(&self, kind: ContentKind, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM content_entries WHERE kind = $1 AND id = $2")
            .bind(kind)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Audit
// ============================================================================

#[async_trait]
impl AuditStore for PgStore {
    async fn append_audit(&self, entry: NewAuditEntry) -> StoreResult<AuditLogEntry> {
        Ok(sqlx::query_as::<_, AuditLogEntry>(&format!(
            r"
            INSERT INTO audit_log (id, user_id, action, entity, entity_id, changes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {AUDIT_COLUMNS}
            "
        ))
        .bind(Uuid::now_v7())
        .bind(entry.user_id)
        .bind(&entry.action)
        .bind(&entry.entity)
        .bind(entry.entity_id.as_deref())
        .bind(entry.changes.as_ref())
        .fetch_one(&self.pool)
        .await?)
    }

    async fn list_audit(
        &self,
        limit: i64,
        offset: i64,
        action_prefix: Option<&str>,
    ) -> StoreResult<(Vec<AuditLogEntry>, i64)> {
        let pattern = action_prefix.map(|p| format!("{}%", escape_like(p)));

        let total: i64 = sqlx::query_scalar(
            r"SELECT COUNT(*) FROM audit_log WHERE ($1::text IS NULL OR action LIKE $1 ESCAPE '\')",
        )
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await?;

        let entries = sqlx::query_as::<_, AuditLogEntry>(&format!(
            r"
            SELECT {AUDIT_COLUMNS} FROM audit_log
            WHERE ($1::text IS NULL OR action LIKE $1 ESCAPE '\')
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "
        ))
        .bind(pattern.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((entries, total))
    }
}
