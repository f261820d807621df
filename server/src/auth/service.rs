//! Identity & Session operations.

use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};
use wiki_common::RoleName;

use super::error::{AuthError, AuthResult};
use super::jwt::{issue_token, verify_token};
use super::password::{hash_password, verify_dummy, verify_password};
use super::types::{AuthResponse, RegisterRequest, UserProfile};
use crate::access::Actor;
use crate::api::AppState;
use crate::audit::{self, AuditAction};
use crate::config::Config;
use crate::db::{NewUser, Store, User};
use crate::roles::{resolve_role, resolve_role_by_id, ResolvedRole};

/// Create an account with the `user` role.
///
/// Nothing is written (row or audit entry) when the username or email is
/// already taken.
pub async fn register<S>(
    store: &S,
    config: &Config,
    request: &RegisterRequest,
) -> AuthResult<(User, ResolvedRole)>
where
    S: Store + ?Sized,
{
    let role = resolve_role(store, RoleName::User).await?;
    let password_hash = hash_password(&request.password, config.password_hash_cost)?;

    let user = store
        .create_user(NewUser {
            username: request.username.clone(),
            email: request.email.to_lowercase(),
            password_hash,
            role_id: role.id,
        })
        .await?;

    audit::record(
        store,
        Some(user.id),
        AuditAction::UserRegister,
        "user",
        user.id,
        Some(audit::snapshot(
            None::<&()>,
            Some(&json!({ "username": user.username, "email": user.email })),
        )),
    )
    .await;

    info!(user_id = %user.id, username = %user.username, "User registered");
    Ok((user, role))
}

/// Check credentials and issue a session.
///
/// Unknown identifiers and wrong passwords fail identically, after the same
/// amount of hashing work.
pub async fn authenticate<S>(
    store: &S,
    config: &Config,
    identifier: &str,
    password: &str,
) -> AuthResult<AuthResponse>
where
    S: Store + ?Sized,
{
    let user = if identifier.contains('@') {
        store.find_user_by_email(identifier).await?
    } else {
        store.find_user_by_username(identifier).await?
    };

    let Some(user) = user else {
        verify_dummy(password, config.password_hash_cost);
        return Err(AuthError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials);
    }

    if !user.is_active {
        return Err(AuthError::AccountDisabled);
    }

    let role = resolve_role_by_id(store, user.role_id).await?;
    let token = issue_token(user.id, &user.username, &config.jwt_secret, config.jwt_expiry)?;

    let now = Utc::now();
    if let Err(e) = store.record_login(user.id, now).await {
        warn!(user_id = %user.id, error = %e, "Failed to record login");
    }

    info!(user_id = %user.id, "User logged in");

    let mut user = user;
    user.last_login_at = Some(now);
    user.login_count += 1;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer",
        expires_in: config.jwt_expiry,
        user: UserProfile::new(user, &role),
    })
}

/// Resolve a bearer token to an actor with a freshly loaded role.
pub async fn actor_from_token(state: &AppState, token: &str) -> AuthResult<Actor> {
    let claims = verify_token(token, &state.config.jwt_secret)?;
    let user_id = claims.user_id()?;

    let user = state
        .store
        .find_user_by_id(user_id)
        .await?
        .ok_or(AuthError::InvalidToken)?;
    let role = resolve_role_by_id(&*state.store, user.role_id).await?;

    Ok(Actor::new(&user, &role))
}
