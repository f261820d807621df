//! Authentication request and response types.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::User;
use crate::roles::{ResolvedRole, RoleSummary};

static USERNAME_REGEX: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[A-Za-z0-9_]{3,32}$").expect("valid regex"));

/// Registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// 3-32 characters: letters, digits, underscore.
    #[validate(regex(path = *USERNAME_REGEX, message = "3-32 letters, digits or underscores"))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Login request. The identifier is an email when it contains `@`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(alias = "username", alias = "email")]
    #[validate(length(min = 1, max = 255))]
    pub identifier: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Self-service profile update.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(email)]
    pub email: Option<String>,
}

/// Issued session.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Always "Bearer".
    pub token_type: &'static str,
    /// Lifetime in seconds.
    pub expires_in: i64,
    pub user: UserProfile,
}

/// User as returned by the API. Never includes the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: RoleSummary,
    pub is_active: bool,
    pub is_premium: bool,
    pub email_verified: bool,
    pub login_count: i32,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    #[must_use]
    pub fn new(user: User, role: &ResolvedRole) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: role.into(),
            is_active: user.is_active,
            is_premium: user.is_premium,
            email_verified: user.email_verified,
            login_count: user.login_count,
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(register("alice_01", "alice@example.com", "password123")
            .validate()
            .is_ok());
        assert!(register("al", "alice@example.com", "password123")
            .validate()
            .is_err());
        assert!(register("alice!", "alice@example.com", "password123")
            .validate()
            .is_err());
        assert!(register("alice", "not-an-email", "password123")
            .validate()
            .is_err());
        assert!(register("alice", "alice@example.com", "short")
            .validate()
            .is_err());
    }

    #[test]
    fn test_login_accepts_username_alias() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"username": "alice", "password": "pw"}"#).unwrap();
        assert_eq!(req.identifier, "alice");

        let req: LoginRequest =
            serde_json::from_str(r#"{"email": "a@example.com", "password": "pw"}"#).unwrap();
        assert_eq!(req.identifier, "a@example.com");
    }
}
