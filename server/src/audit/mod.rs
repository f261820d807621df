//! Audit Trail
//!
//! Append-only record of privileged mutations. Writes are awaited inline so
//! the entry exists by the time the response is sent, but a failed write
//! never fails the operation that triggered it.

use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::db::{AuditStore, NewAuditEntry};

/// Audited action tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditAction {
    UserRegister,
    UserRoleChange,
    UserStatusChange,
    UserDelete,
    UserProfileUpdate,
    SettingUpdate,
    ContentCreate,
    ContentUpdate,
    ContentPublish,
    ContentUnpublish,
    ContentDelete,
}

impl AuditAction {
    /// Stored `action` column value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserRegister => "user.register",
            Self::UserRoleChange => "user.role_change",
            Self::UserStatusChange => "user.status_change",
            Self::UserDelete => "user.delete",
            Self::UserProfileUpdate => "user.profile_update",
            Self::SettingUpdate => "setting.update",
            Self::ContentCreate => "content.create",
            Self::ContentUpdate => "content.update",
            Self::ContentPublish => "content.publish",
            Self::ContentUnpublish => "content.unpublish",
            Self::ContentDelete => "content.delete",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{"before": ..., "after": ...}` change snapshot.
pub fn snapshot<B, A>(before: Option<&B>, after: Option<&A>) -> Value
where
    B: Serialize + ?Sized,
    A: Serialize + ?Sized,
{
    json!({ "before": before, "after": after })
}

/// Append an audit entry. Failures are logged and swallowed.
pub async fn record<S>(
    store: &S,
    actor_id: Option<Uuid>,
    action: AuditAction,
    entity: &str,
    entity_id: impl ToString,
    changes: Option<Value>,
) where
    S: AuditStore + ?Sized,
{
    let entry = NewAuditEntry {
        user_id: actor_id,
        action: action.as_str().to_string(),
        entity: entity.to_string(),
        entity_id: Some(entity_id.to_string()),
        changes,
    };

    if let Err(e) = store.append_audit(entry).await {
        tracing::warn!(
            error = %e,
            action = %action,
            entity,
            "Failed to write audit log entry"
        );
    }
}
