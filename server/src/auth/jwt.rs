//! Session Tokens
//!
//! HS256 JWTs signed with the configured secret. A token carries identity
//! only; role and account state are looked up fresh on every request.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{AuthError, AuthResult};

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID as UUID string).
    pub sub: String,
    pub username: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Unique token ID.
    pub jti: String,
}

impl Claims {
    pub fn user_id(&self) -> AuthResult<Uuid> {
        self.sub.parse().map_err(|_| AuthError::InvalidToken)
    }
}

/// Sign a session token for a user.
pub fn issue_token(
    user_id: Uuid,
    username: &str,
    secret: &str,
    expiry_seconds: i64,
) -> AuthResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(expiry_seconds)).timestamp(),
        jti: Uuid::now_v7().to_string(),
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// Validate signature and expiry, returning the claims.
pub fn verify_token(token: &str, secret: &str) -> AuthResult<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub", "iat"]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_round_trip() {
        let user_id = Uuid::now_v7();
        let token = issue_token(user_id, "alice", SECRET, 3600).unwrap();

        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token() {
        let token = issue_token(Uuid::now_v7(), "alice", SECRET, -10).unwrap();
        assert!(matches!(
            verify_token(&token, SECRET),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_wrong_secret() {
        let token = issue_token(Uuid::now_v7(), "alice", SECRET, 3600).unwrap();
        assert!(matches!(
            verify_token(&token, "other-secret"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_malformed_token() {
        assert!(matches!(
            verify_token("not.a.jwt", SECRET),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(verify_token("", SECRET), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_tokens_are_unique() {
        let user_id = Uuid::now_v7();
        let a = verify_token(&issue_token(user_id, "a", SECRET, 60).unwrap(), SECRET).unwrap();
        let b = verify_token(&issue_token(user_id, "a", SECRET, 60).unwrap(), SECRET).unwrap();
        assert_ne!(a.jti, b.jti);
    }
}
