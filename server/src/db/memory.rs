//! In-memory implementation of the storage port.
//!
//! Used by the integration tests and for running the server without a
//! database. All writes go through a single `RwLock`, so uniqueness checks
//! and inserts are atomic with respect to each other.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{
    AuditLogEntry, ContentEntry, ContentKind, ContentPatch, ContentQuery, NewAuditEntry,
    NewContent, NewRole, NewSetting, NewUser, Role, SiteSetting, User,
};
use super::store::{
    AuditStore, ContentStore, RoleStore, SettingStore, StoreError, StoreResult, UserStore,
};

#[derive(Debug, Default)]
struct Tables {
    roles: HashMap<Uuid, Role>,
    users: HashMap<Uuid, User>,
    settings: HashMap<String, SiteSetting>,
    content: HashMap<Uuid, ContentEntry>,
    audit: Vec<AuditLogEntry>,
}

/// Store holding every table in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Slice one page out of an already ordered list.
fn page<T: Clone>(rows: &[T], limit: i64, offset: i64) -> Vec<T> {
    let offset = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
    let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
    rows.iter().skip(offset).take(limit).cloned().collect()
}

fn count(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}

// ============================================================================
// Roles
// ============================================================================

#[async_trait]
impl RoleStore for MemoryStore {
    async fn find_role_by_name(&self, name: &str) -> StoreResult<Option<Role>> {
        let tables = self.tables.read().await;
        Ok(tables.roles.values().find(|r| r.name == name).cloned())
    }

    async fn find_role_by_id(&self, id: Uuid) -> StoreResult<Option<Role>> {
        Ok(self.tables.read().await.roles.get(&id).cloned())
    }

    async fn list_roles(&self) -> StoreResult<Vec<Role>> {
        let tables = self.tables.read().await;
        let mut roles: Vec<Role> = tables.roles.values().cloned().collect();
        roles.sort_by(|a, b| b.priority.cmp(&a.priority));
        Ok(roles)
    }

    async fn upsert_role(&self, role: NewRole) -> StoreResult<Role> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.roles.values_mut().find(|r| r.name == role.name) {
            existing.display_name = role.display_name;
            existing.priority = role.priority;
            existing.permissions = role.permissions;
            return Ok(existing.clone());
        }

        let created = Role {
            id: Uuid::now_v7(),
            name: role.name,
            display_name: role.display_name,
            priority: role.priority,
            permissions: role.permissions,
            created_at: Utc::now(),
        };
        tables.roles.insert(created.id, created.clone());
        Ok(created)
    }
}

// ============================================================================
// Users
// ============================================================================

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        let email = user.email.to_lowercase();

        if tables.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict("username"));
        }
        if tables.users.values().any(|u| u.email == email) {
            return Err(StoreError::Conflict("email"));
        }
        if !tables.roles.contains_key(&user.role_id) {
            return Err(StoreError::MissingReference("role"));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::now_v7(),
            username: user.username,
            email,
            password_hash: user.password_hash,
            role_id: user.role_id,
            is_active: true,
            is_premium: false,
            email_verified: false,
            login_count: 0,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        };
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let email = email.to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self, limit: i64, offset: i64) -> StoreResult<(Vec<User>, i64)> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok((page(&users, limit, offset), count(users.len())))
    }

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(user) = tables.users.get_mut(&id) {
            user.last_login_at = Some(at);
            user.login_count += 1;
        }
        Ok(())
    }

    async fn update_user_email(&self, id: Uuid, email: &str) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write().await;
        let email = email.to_lowercase();
        if tables.users.values().any(|u| u.email == email && u.id != id) {
            return Err(StoreError::Conflict("email"));
        }
        Ok(tables.users.get_mut(&id).map(|user| {
            user.email = email;
            user.email_verified = false;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn set_user_role(&self, id: Uuid, role_id: Uuid) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write().await;
        if !tables.roles.contains_key(&role_id) {
            return Err(StoreError::MissingReference("role"));
        }
        Ok(tables.users.get_mut(&id).map(|user| {
            user.role_id = role_id;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn set_user_active(&self, id: Uuid, is_active: bool) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(&id).map(|user| {
            user.is_active = is_active;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.write().await.users.remove(&id).is_some())
    }

    async fn count_users_with_role(&self, role_id: Uuid) -> StoreResult<i64> {
        let tables = self.tables.read().await;
        Ok(count(
            tables.users.values().filter(|u| u.role_id == role_id).count(),
        ))
    }
}

// ============================================================================
// Settings
// ============================================================================

#[async_trait]
impl SettingStore for MemoryStore {
    async fn list_settings(&self) -> StoreResult<Vec<SiteSetting>> {
        let tables = self.tables.read().await;
        let mut settings: Vec<SiteSetting> = tables.settings.values().cloned().collect();
        settings.sort_by(|a, b| a.category.cmp(&b.category).then(a.key.cmp(&b.key)));
        Ok(settings)
    }

    async fn find_setting(&self, key: &str) -> StoreResult<Option<SiteSetting>> {
        Ok(self.tables.read().await.settings.get(key).cloned())
    }

    async fn update_setting_value(
        &self,
        key: &str,
        value: &str,
        updated_by: Uuid,
    ) -> StoreResult<Option<SiteSetting>> {
        let mut tables = self.tables.write().await;
        Ok(tables.settings.get_mut(key).map(|setting| {
            setting.value = value.to_string();
            setting.updated_by = Some(updated_by);
            setting.updated_at = Utc::now();
            setting.clone()
        }))
    }

    async fn insert_setting_if_missing(&self, setting: NewSetting) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .settings
            .entry(setting.key.clone())
            .or_insert_with(|| SiteSetting {
                key: setting.key,
                value: setting.value,
                category: setting.category,
                access_level: setting.access_level,
                updated_by: None,
                updated_at: Utc::now(),
            });
        Ok(())
    }
}

// ============================================================================
// Content
// ============================================================================

#[async_trait]
impl ContentStore for MemoryStore {
    async fn list_content(&self, query: &ContentQuery) -> StoreResult<(Vec<ContentEntry>, i64)> {
        let needle = query.search.as_deref().map(str::to_lowercase);
        let tables = self.tables.read().await;

        let mut rows: Vec<ContentEntry> = tables
            .content
            .values()
            .filter(|c| c.kind == query.kind)
            .filter(|c| query.published.is_none_or(|p| c.published == p))
            .filter(|c| {
                needle
                    .as_deref()
                    .is_none_or(|n| c.title.to_lowercase().contains(n))
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok((page(&rows, query.limit, query.offset), count(rows.len())))
    }

    async fn find_content_by_slug(
        &self,
        kind: ContentKind,
        slug: &str,
    ) -> StoreResult<Option<ContentEntry>> {
        let tables = self.tables.read().await;
        Ok(tables
            .content
            .values()
            .find(|c| c.kind == kind && c.slug == slug)
            .cloned())
    }

    async fn find_content_by_id(
        &self,
        kind: ContentKind,
        id: Uuid,
    ) -> StoreResult<Option<ContentEntry>> {
        let tables = self.tables.read().await;
        Ok(tables.content.get(&id).filter(|c| c.kind == kind).cloned())
    }

    async fn create_content(&self, content: NewContent) -> StoreResult<ContentEntry> {
        let mut tables = self.tables.write().await;
        if tables
            .content
            .values()
            .any(|c| c.kind == content.kind && c.slug == content.slug)
        {
            return Err(StoreError::Conflict("slug"));
        }

        let now = Utc::now();
        let created = ContentEntry {
            id: Uuid::now_v7(),
            kind: content.kind,
            slug: content.slug,
            title: content.title,
            summary: content.summary,
            body: content.body,
            published: content.published,
            author_id: content.author_id,
            created_at: now,
            updated_at: now,
        };
        tables.content.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_content(
        &self,
        kind: ContentKind,
        id: Uuid,
        patch: ContentPatch,
    ) -> StoreResult<Option<ContentEntry>> {
        let mut tables = self.tables.write().await;
        if let Some(ref slug) = patch.slug {
            if tables
                .content
                .values()
                .any(|c| c.kind == kind && c.slug == *slug && c.id != id)
            {
                return Err(StoreError::Conflict("slug"));
            }
        }

        Ok(tables
            .content
            .get_mut(&id)
            .filter(|c| c.kind == kind)
            .map(|entry| {
                if let Some(slug) = patch.slug {
                    entry.slug = slug;
                }
                if let Some(title) = patch.title {
                    entry.title = title;
                }
                if let Some(summary) = patch.summary {
                    entry.summary = Some(summary);
                }
                if let Some(body) = patch.body {
                    entry.body = body;
                }
                entry.updated_at = Utc::now();
                entry.clone()
            }))
    }

    async fn set_content_published(
        &self,
        kind: ContentKind,
        id: Uuid,
        published: bool,
    ) -> StoreResult<Option<ContentEntry>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .content
            .get_mut(&id)
            .filter(|c| c.kind == kind)
            .map(|entry| {
                entry.published = published;
                entry.updated_at = Utc::now();
                entry.clone()
            }))
    }

    async fn delete_content(&self, kind: ContentKind, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let matches = tables.content.get(&id).is_some_and(|c| c.kind == kind);
        if matches {
            tables.content.remove(&id);
        }
        Ok(matches)
    }
}

// ============================================================================
// Audit
// ============================================================================

#[async_trait]
impl AuditStore for MemoryStore {
    async fn append_audit(&self, entry: NewAuditEntry) -> StoreResult<AuditLogEntry> {
        let created = AuditLogEntry {
            id: Uuid::now_v7(),
            user_id: entry.user_id,
            action: entry.action,
            entity: entry.entity,
            entity_id: entry.entity_id,
            changes: entry.changes,
            created_at: Utc::now(),
        };
        self.tables.write().await.audit.push(created.clone());
        Ok(created)
    }

    async fn list_audit(
        &self,
        limit: i64,
        offset: i64,
        action_prefix: Option<&str>,
    ) -> StoreResult<(Vec<AuditLogEntry>, i64)> {
        let tables = self.tables.read().await;
        // Appended in time order; newest first means walking backwards.
        let rows: Vec<AuditLogEntry> = tables
            .audit
            .iter()
            .rev()
            .filter(|e| action_prefix.is_none_or(|p| e.action.starts_with(p)))
            .cloned()
            .collect();
        Ok((page(&rows, limit, offset), count(rows.len())))
    }
}
