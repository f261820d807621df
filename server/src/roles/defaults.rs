//! Seeded role definitions.

use tracing::info;
use wiki_common::RoleName;

use crate::db::{NewRole, RoleStore, StoreResult};
use crate::permissions::Capabilities;

/// Capability set each role ships with.
#[must_use]
pub const fn default_capabilities(name: RoleName) -> Capabilities {
    match name {
        RoleName::User => Capabilities::empty(),
        RoleName::ContentManager => Capabilities::CONTENT_MANAGER_DEFAULT,
        RoleName::Moderator => Capabilities::MODERATOR_DEFAULT,
        RoleName::Admin | RoleName::Founder => Capabilities::all(),
    }
}

/// Upsert the five roles by name. Safe to run on every start.
pub async fn seed_roles<S>(store: &S) -> StoreResult<()>
where
    S: RoleStore + ?Sized,
{
    for name in RoleName::all() {
        store
            .upsert_role(NewRole {
                name: name.as_str().to_string(),
                display_name: name.display_name().to_string(),
                priority: name.default_priority(),
                permissions: default_capabilities(*name).to_document(),
            })
            .await?;
    }
    info!(count = RoleName::all().len(), "Roles seeded");
    Ok(())
}
