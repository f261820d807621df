//! Admin module types.

use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use wiki_common::RoleName;

use crate::access::AccessError;
use crate::api::PageParams;
use crate::db::StoreError;
use crate::error::ApiError;
use crate::roles::RoleError;

/// Admin API error type.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("User not found")]
    UserNotFound(Uuid),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Role(#[from] RoleError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AdminError> for ApiError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::UserNotFound(_) => Self::not_found(err.to_string()),
            AdminError::Access(e) => e.into(),
            AdminError::Role(e) => e.into(),
            AdminError::Store(e) => e.into(),
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

// Request types
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: RoleName,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub is_active: bool,
}

/// Audit log query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct AuditLogParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Filter by action prefix (e.g. "user." for all account actions).
    pub action: Option<String>,
}

impl AuditLogParams {
    #[must_use]
    pub const fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }

    /// Trimmed, non-empty action prefix.
    #[must_use]
    pub fn action_prefix(&self) -> Option<&str> {
        self.action
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }
}

// Response types
#[derive(Debug, Serialize)]
pub struct DeletedUser {
    pub id: Uuid,
    pub deleted: bool,
}
