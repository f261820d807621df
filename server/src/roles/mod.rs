//! Role Registry
//!
//! Five named roles, each with a numeric priority (higher means more trust)
//! and a permission document. The name is the stable identifier used by the
//! guard; the id only links users to their role row.

mod defaults;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;
use wiki_common::RoleName;

pub use defaults::{default_capabilities, seed_roles};

use crate::db::{Role, RoleStore, StoreError};
use crate::error::ApiError;
use crate::permissions::Capabilities;

/// Role registry errors.
#[derive(Debug, Error)]
pub enum RoleError {
    /// No role row with this name or id.
    #[error("Role not found: {0}")]
    NotFound(String),

    /// Stored role name outside the closed set.
    #[error("Unrecognized role name in storage: {0}")]
    Unrecognized(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<RoleError> for ApiError {
    fn from(err: RoleError) -> Self {
        match err {
            RoleError::NotFound(_) => Self::not_found(err.to_string()),
            RoleError::Unrecognized(_) => Self::internal(err),
            RoleError::Store(e) => e.into(),
        }
    }
}

/// A role row with its name and permission document parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRole {
    pub id: Uuid,
    pub name: RoleName,
    pub display_name: String,
    pub priority: i32,
    pub capabilities: Capabilities,
}

impl TryFrom<Role> for ResolvedRole {
    type Error = RoleError;

    fn try_from(role: Role) -> Result<Self, Self::Error> {
        let name = role
            .name
            .parse::<RoleName>()
            .map_err(|_| RoleError::Unrecognized(role.name.clone()))?;
        Ok(Self {
            id: role.id,
            name,
            display_name: role.display_name,
            priority: role.priority,
            capabilities: Capabilities::from_document(&role.permissions),
        })
    }
}

/// Public view of a role.
#[derive(Debug, Clone, Serialize)]
pub struct RoleSummary {
    pub name: RoleName,
    pub display_name: String,
    pub priority: i32,
    /// Dotted keys of granted capabilities.
    pub permissions: Vec<String>,
}

impl From<&ResolvedRole> for RoleSummary {
    fn from(role: &ResolvedRole) -> Self {
        Self {
            name: role.name,
            display_name: role.display_name.clone(),
            priority: role.priority,
            permissions: role.capabilities.keys(),
        }
    }
}

/// Look up a role by name.
pub async fn resolve_role<S>(store: &S, name: RoleName) -> Result<ResolvedRole, RoleError>
where
    S: RoleStore + ?Sized,
{
    store
        .find_role_by_name(name.as_str())
        .await?
        .ok_or_else(|| RoleError::NotFound(name.to_string()))?
        .try_into()
}

/// Look up the role a user row points at.
pub async fn resolve_role_by_id<S>(store: &S, id: Uuid) -> Result<ResolvedRole, RoleError>
where
    S: RoleStore + ?Sized,
{
    store
        .find_role_by_id(id)
        .await?
        .ok_or_else(|| RoleError::NotFound(id.to_string()))?
        .try_into()
}

/// All roles, most trusted first.
pub async fn list_roles<S>(store: &S) -> Result<Vec<ResolvedRole>, RoleError>
where
    S: RoleStore + ?Sized,
{
    store
        .list_roles()
        .await?
        .into_iter()
        .map(ResolvedRole::try_from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::permissions::Capability;

    #[tokio::test]
    async fn test_resolve_seeded_roles() {
        let store = MemoryStore::new();
        seed_roles(&store).await.unwrap();

        for name in RoleName::all() {
            let role = resolve_role(&store, *name).await.unwrap();
            assert_eq!(role.name, *name);
            assert_eq!(role.priority, name.default_priority());
            assert_eq!(role.capabilities, default_capabilities(*name));

            let by_id = resolve_role_by_id(&store, role.id).await.unwrap();
            assert_eq!(by_id, role);
        }
    }

    #[tokio::test]
    async fn test_missing_role_is_not_found() {
        let store = MemoryStore::new();
        let err = resolve_role(&store, RoleName::Admin).await.unwrap_err();
        assert!(matches!(err, RoleError::NotFound(ref n) if n == "admin"));
    }

    #[tokio::test]
    async fn test_list_roles_most_trusted_first() {
        let store = MemoryStore::new();
        seed_roles(&store).await.unwrap();

        let names: Vec<RoleName> = list_roles(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(
            names,
            vec![
                RoleName::Founder,
                RoleName::Admin,
                RoleName::Moderator,
                RoleName::ContentManager,
                RoleName::User,
            ]
        );
    }

    #[tokio::test]
    async fn test_unrecognized_stored_name() {
        let store = MemoryStore::new();
        let row = store
            .upsert_role(crate::db::NewRole {
                name: "wizard".into(),
                display_name: "Wizard".into(),
                priority: 70,
                permissions: serde_json::json!({}),
            })
            .await
            .unwrap();

        let err = resolve_role_by_id(&store, row.id).await.unwrap_err();
        assert!(matches!(err, RoleError::Unrecognized(_)));
    }

    #[test]
    fn test_summary_lists_dotted_keys() {
        let role = ResolvedRole {
            id: Uuid::now_v7(),
            name: RoleName::Moderator,
            display_name: "Moderator".into(),
            priority: 60,
            capabilities: Capabilities::AUDIT_VIEW,
        };
        let summary = RoleSummary::from(&role);
        assert_eq!(summary.permissions, vec![Capability::AuditView.key()]);
    }
}
