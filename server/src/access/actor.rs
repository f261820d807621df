//! Request actor.
//!
//! Resolved once per request by [`super::resolve_actor`] from the bearer
//! token plus a fresh role lookup, then read by handlers through the
//! [`Actor`] and [`Viewer`] extractors.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;
use wiki_common::RoleName;

use super::error::AccessError;
use crate::db::User;
use crate::error::ApiError;
use crate::permissions::{Capabilities, Capability};
use crate::roles::ResolvedRole;

/// The authenticated principal behind a request.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: Uuid,
    pub username: String,
    pub role: RoleName,
    /// Priority of the role as stored, used for hierarchy checks.
    pub priority: i32,
    pub capabilities: Capabilities,
    pub is_active: bool,
}

impl Actor {
    #[must_use]
    pub fn new(user: &User, role: &ResolvedRole) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            role: role.name,
            priority: role.priority,
            capabilities: role.capabilities,
            is_active: user.is_active,
        }
    }

    #[must_use]
    pub const fn can(&self, capability: Capability) -> bool {
        self.capabilities.has(capability)
    }

    #[must_use]
    pub fn is_founder(&self) -> bool {
        self.role == RoleName::Founder
    }
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| AccessError::Unauthenticated.into())
    }
}

/// Optional actor for public-read routes.
///
/// An inactive account reads like an anonymous visitor.
#[derive(Debug, Clone, Default)]
pub struct Viewer(pub Option<Actor>);

impl Viewer {
    #[must_use]
    pub const fn anonymous() -> Self {
        Self(None)
    }

    /// Whether the viewer holds `capability` through an active account.
    #[must_use]
    pub fn can(&self, capability: Capability) -> bool {
        self.0
            .as_ref()
            .is_some_and(|a| a.is_active && a.can(capability))
    }
}

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<Actor>().cloned()))
    }
}
