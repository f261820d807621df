//! Authentication Error Types

use thiserror::Error;

use crate::db::StoreError;
use crate::error::ApiError;
use crate::roles::RoleError;

/// Authentication error types.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown identifier or wrong password. Deliberately indistinguishable.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Correct credentials for a deactivated account.
    #[error("Account is disabled")]
    AccountDisabled,

    /// Malformed token, bad signature, or unknown subject.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// `Authorization` header present but not `Bearer <token>`.
    #[error("Invalid authorization header format")]
    InvalidAuthHeader,

    /// Password hashing error.
    #[error("Password processing failed")]
    PasswordHash,

    /// Token signing error.
    #[error("Token error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Role(#[from] RoleError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::TokenExpired
            | AuthError::InvalidAuthHeader => Self::unauthorized(err.to_string()),
            AuthError::AccountDisabled => Self::forbidden(err.to_string())
                .with_details(serde_json::json!({ "reason": "inactive" })),
            AuthError::PasswordHash | AuthError::Jwt(_) => Self::internal(err),
            AuthError::Role(e) => e.into(),
            AuthError::Store(e) => e.into(),
        }
    }
}
