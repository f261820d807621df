//! Access Guard Errors

use serde_json::json;
use thiserror::Error;
use wiki_common::RoleName;

use crate::error::ApiError;
use crate::permissions::Capability;

/// Reasons the guard refuses an operation.
#[derive(Debug, Error)]
pub enum AccessError {
    /// No actor on a route that needs one.
    #[error("Authentication required")]
    Unauthenticated,

    /// Actor's account is deactivated.
    #[error("Account is disabled")]
    Inactive,

    /// Role name not in the required set.
    #[error("Insufficient role")]
    RoleNotAllowed(Vec<RoleName>),

    /// Role document lacks the capability.
    #[error("Missing permission: {0}")]
    MissingCapability(Capability),

    /// Destructive action aimed at the actor's own account.
    #[error("You cannot perform this action on your own account")]
    SelfAction,

    /// Target's role is not strictly below the actor's.
    #[error("Cannot manage a user with equal or higher rank")]
    Outranked,

    /// Role to assign is not strictly below the actor's.
    #[error("Cannot assign role {0}")]
    CannotAssign(RoleName),

    /// Founder-level setting touched by a non-founder.
    #[error("Only the founder can access this setting")]
    FounderOnly,
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        let message = err.to_string();
        match err {
            AccessError::Unauthenticated => Self::unauthorized(message),
            AccessError::Inactive => {
                Self::forbidden(message).with_details(json!({ "reason": "inactive" }))
            }
            AccessError::RoleNotAllowed(roles) => Self::forbidden(message)
                .with_details(json!({ "required_roles": roles })),
            AccessError::MissingCapability(capability) => Self::forbidden(message)
                .with_details(json!({ "required_permission": capability.key() })),
            AccessError::SelfAction => {
                Self::forbidden(message).with_details(json!({ "reason": "self_action" }))
            }
            AccessError::Outranked | AccessError::CannotAssign(_) => {
                Self::forbidden(message).with_details(json!({ "reason": "hierarchy" }))
            }
            AccessError::FounderOnly => {
                Self::forbidden(message).with_details(json!({ "reason": "founder_only" }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use wiki_common::ErrorKind;

    use super::*;

    #[test]
    fn test_only_missing_actor_is_unauthorized() {
        let err: ApiError = AccessError::Unauthenticated.into();
        assert_eq!(err.kind, ErrorKind::Unauthorized);

        for access in [
            AccessError::Inactive,
            AccessError::SelfAction,
            AccessError::Outranked,
            AccessError::FounderOnly,
            AccessError::MissingCapability(Capability::AuditView),
        ] {
            let err: ApiError = access.into();
            assert_eq!(err.kind, ErrorKind::Forbidden);
        }
    }

    #[test]
    fn test_self_action_reason() {
        let err: ApiError = AccessError::SelfAction.into();
        assert_eq!(err.details, Some(json!({ "reason": "self_action" })));
    }

    #[test]
    fn test_missing_capability_names_key() {
        let err: ApiError = AccessError::MissingCapability(Capability::LegalEdit).into();
        assert_eq!(err.message, "Missing permission: legal.edit");
        assert_eq!(
            err.details,
            Some(json!({ "required_permission": "legal.edit" }))
        );
    }
}
