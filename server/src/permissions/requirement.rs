//! Authorization requirements.
//!
//! Resolution order:
//! 1. No actor -> unauthenticated
//! 2. Inactive account -> forbidden
//! 3. Role set -> role name must be a member
//! 4. Capability -> the role's document must grant it

use wiki_common::RoleName;

use super::capability::Capability;
use crate::access::{AccessError, Actor};

/// What a route or operation demands of its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Any signed-in, active account.
    Authenticated,
    /// Role name must be one of these.
    AnyRole(Vec<RoleName>),
    /// Role document must grant this capability.
    Capability(Capability),
}

impl Requirement {
    /// Moderator, admin or founder.
    #[must_use]
    pub fn moderator_or_above() -> Self {
        Self::AnyRole(RoleName::at_least(RoleName::Moderator))
    }

    /// Admin or founder.
    #[must_use]
    pub fn admin_or_above() -> Self {
        Self::AnyRole(RoleName::at_least(RoleName::Admin))
    }

    #[must_use]
    pub fn founder_only() -> Self {
        Self::AnyRole(vec![RoleName::Founder])
    }

    /// Decide whether `actor` satisfies this requirement.
    ///
    /// Pure function of its inputs: the same actor and requirement always
    /// produce the same decision.
    pub fn evaluate(&self, actor: Option<&Actor>) -> Result<(), AccessError> {
        let actor = actor.ok_or(AccessError::Unauthenticated)?;

        if !actor.is_active {
            return Err(AccessError::Inactive);
        }

        match self {
            Self::Authenticated => Ok(()),
            Self::AnyRole(roles) => {
                if roles.contains(&actor.role) {
                    Ok(())
                } else {
                    Err(AccessError::RoleNotAllowed(roles.clone()))
                }
            }
            Self::Capability(capability) => {
                if actor.capabilities.has(*capability) {
                    Ok(())
                } else {
                    Err(AccessError::MissingCapability(*capability))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::db::ContentKind;
    use crate::permissions::{Capabilities, ContentOp};

    fn actor(role: RoleName, capabilities: Capabilities) -> Actor {
        Actor {
            user_id: Uuid::now_v7(),
            username: "tester".into(),
            role,
            priority: role.default_priority(),
            capabilities,
            is_active: true,
        }
    }

    #[test]
    fn test_anonymous_is_unauthenticated() {
        for requirement in [
            Requirement::Authenticated,
            Requirement::admin_or_above(),
            Requirement::Capability(Capability::AuditView),
        ] {
            assert!(matches!(
                requirement.evaluate(None),
                Err(AccessError::Unauthenticated)
            ));
        }
    }

    #[test]
    fn test_inactive_checked_before_role() {
        let mut founder = actor(RoleName::Founder, Capabilities::all());
        founder.is_active = false;

        assert!(matches!(
            Requirement::founder_only().evaluate(Some(&founder)),
            Err(AccessError::Inactive)
        ));
        assert!(matches!(
            Requirement::Authenticated.evaluate(Some(&founder)),
            Err(AccessError::Inactive)
        ));
    }

    #[test]
    fn test_role_sets_are_monotonic() {
        // Anyone allowed into "moderator or above" is also allowed into every
        // lower threshold.
        for min in RoleName::all() {
            let requirement = Requirement::AnyRole(RoleName::at_least(*min));
            for role in RoleName::all() {
                let allowed = requirement
                    .evaluate(Some(&actor(*role, Capabilities::empty())))
                    .is_ok();
                assert_eq!(allowed, role.default_priority() >= min.default_priority());
            }
        }
    }

    #[test]
    fn test_admin_is_not_founder() {
        let admin = actor(RoleName::Admin, Capabilities::all());
        let err = Requirement::founder_only()
            .evaluate(Some(&admin))
            .unwrap_err();
        assert!(matches!(err, AccessError::RoleNotAllowed(roles) if roles == vec![RoleName::Founder]));
    }

    #[test]
    fn test_capability_requirement() {
        let publish = Capability::Content(ContentKind::Guide, ContentOp::Publish);
        let editor = actor(RoleName::User, Capabilities::GUIDES_EDIT);

        assert!(Requirement::Capability(Capability::Content(
            ContentKind::Guide,
            ContentOp::Edit
        ))
        .evaluate(Some(&editor))
        .is_ok());
        assert!(matches!(
            Requirement::Capability(publish).evaluate(Some(&editor)),
            Err(AccessError::MissingCapability(c)) if c == publish
        ));
    }

    #[test]
    fn test_decisions_are_idempotent() {
        let moderator = actor(RoleName::Moderator, Capabilities::MODERATOR_DEFAULT);
        let requirement = Requirement::Capability(Capability::UsersView);
        let first = requirement.evaluate(Some(&moderator)).is_ok();
        for _ in 0..5 {
            assert_eq!(requirement.evaluate(Some(&moderator)).is_ok(), first);
        }
    }
}
