//! Guard rules that depend on the target of an operation.
//!
//! [`crate::permissions::Requirement`] covers route-level checks; these
//! helpers cover the rules that need to know who or what is being acted on.

use uuid::Uuid;

use super::actor::Actor;
use super::error::AccessError;
use crate::db::{SettingAccessLevel, SiteSetting};
use crate::permissions::Capability;
use crate::roles::ResolvedRole;

/// Settings in this category additionally need `legal.edit` to change.
pub const LEGAL_CATEGORY: &str = "legal";

/// Reject destructive actions aimed at the actor's own account.
pub fn ensure_not_self(actor: &Actor, target_id: Uuid) -> Result<(), AccessError> {
    if actor.user_id == target_id {
        return Err(AccessError::SelfAction);
    }
    Ok(())
}

/// The actor must strictly outrank the target's current role.
pub fn ensure_outranks(actor: &Actor, target_role: &ResolvedRole) -> Result<(), AccessError> {
    if target_role.priority >= actor.priority {
        return Err(AccessError::Outranked);
    }
    Ok(())
}

/// Only roles strictly below the actor's may be assigned. Founders assign anything.
pub fn ensure_can_assign(actor: &Actor, role: &ResolvedRole) -> Result<(), AccessError> {
    if actor.is_founder() || role.priority < actor.priority {
        return Ok(());
    }
    Err(AccessError::CannotAssign(role.name))
}

/// Direct read of a setting. Founder-level settings are founder-only.
pub fn ensure_can_read_setting(actor: &Actor, setting: &SiteSetting) -> Result<(), AccessError> {
    if setting.access_level == SettingAccessLevel::Founder && !actor.is_founder() {
        return Err(AccessError::FounderOnly);
    }
    Ok(())
}

/// Mutation of a setting.
///
/// Founder-level settings need the founder role; no capability grants it.
/// Legal settings also need `legal.edit`.
pub fn ensure_can_update_setting(actor: &Actor, setting: &SiteSetting) -> Result<(), AccessError> {
    ensure_can_read_setting(actor, setting)?;

    if setting.category == LEGAL_CATEGORY && !actor.can(Capability::LegalEdit) {
        return Err(AccessError::MissingCapability(Capability::LegalEdit));
    }
    Ok(())
}

/// Whether a setting shows up in the actor's settings listing.
#[must_use]
pub fn setting_visible_to(actor: &Actor, setting: &SiteSetting) -> bool {
    ensure_can_read_setting(actor, setting).is_ok()
}
