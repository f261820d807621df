//! Startup seeding.
//!
//! Every step is idempotent and runs on each start: roles are upserted,
//! missing settings are inserted, and a founder account is created from
//! configuration only while no founder exists.

use serde_json::json;
use thiserror::Error;
use tracing::info;
use validator::Validate;
use wiki_common::RoleName;

use crate::audit::{self, AuditAction};
use crate::auth::{hash_password, AuthError, RegisterRequest};
use crate::config::{Config, FounderBootstrap};
use crate::db::{NewUser, Store, StoreError, User};
use crate::roles::{resolve_role, seed_roles, RoleError};
use crate::settings::seed_settings;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Seeding failed: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Role(#[from] RoleError),

    #[error("Founder account: {0}")]
    Founder(#[from] AuthError),

    /// Names the rejected fields only; the values come from secrets.
    #[error("Invalid founder credentials: {}", .0.join(", "))]
    InvalidFounder(Vec<String>),
}

/// Seed roles and settings, then create the founder if configured.
pub async fn run<S>(store: &S, config: &Config) -> Result<(), BootstrapError>
where
    S: Store + ?Sized,
{
    seed_roles(store).await?;
    seed_settings(store).await?;

    if let Some(founder) = &config.founder {
        bootstrap_founder(store, founder, config.password_hash_cost).await?;
    }
    Ok(())
}

/// Create the founder account unless some user already holds the role.
///
/// Credentials go through the same rules as self-registration, so the
/// founder can always log in by username. Returns the new account, or `None`
/// when a founder already exists.
pub async fn bootstrap_founder<S>(
    store: &S,
    founder: &FounderBootstrap,
    hash_cost: u32,
) -> Result<Option<User>, BootstrapError>
where
    S: Store + ?Sized,
{
    let role = resolve_role(store, RoleName::Founder).await?;
    if store.count_users_with_role(role.id).await? > 0 {
        info!("Founder account already present");
        return Ok(None);
    }

    let credentials = RegisterRequest {
        username: founder.username.clone(),
        email: founder.email.to_lowercase(),
        password: founder.password.clone(),
    };
    credentials.validate().map_err(|errors| {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(ToString::to_string)
            .collect();
        fields.sort();
        BootstrapError::InvalidFounder(fields)
    })?;

    let password_hash = hash_password(&credentials.password, hash_cost)?;
    let user = store
        .create_user(NewUser {
            username: credentials.username,
            email: credentials.email,
            password_hash,
            role_id: role.id,
        })
        .await?;

    audit::record(
        store,
        None,
        AuditAction::UserRegister,
        "user",
        user.id,
        Some(audit::snapshot(
            None::<&()>,
            Some(&json!({ "username": user.username, "role": role.name })),
        )),
    )
    .await;

    info!(user_id = %user.id, username = %user.username, "Founder account created");
    Ok(Some(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, SettingStore, UserStore};

    fn founder() -> FounderBootstrap {
        FounderBootstrap {
            username: "founder".into(),
            email: "founder@example.com".into(),
            password: "founder-password".into(),
        }
    }

    #[tokio::test]
    async fn test_run_is_idempotent() {
        let store = MemoryStore::new();
        let config = Config {
            founder: Some(founder()),
            ..Config::default_for_test()
        };

        run(&store, &config).await.unwrap();
        run(&store, &config).await.unwrap();

        let (users, total) = store.list_users(10, 0).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(users[0].username, "founder");
        assert!(store.find_setting("yandex_metrika_id").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_founder_gets_founder_role() {
        let store = MemoryStore::new();
        seed_roles(&store).await.unwrap();

        let user = bootstrap_founder(&store, &founder(), 1)
            .await
            .unwrap()
            .unwrap();
        let role = resolve_role(&store, RoleName::Founder).await.unwrap();
        assert_eq!(user.role_id, role.id);

        let again = bootstrap_founder(&store, &founder(), 1).await.unwrap();
        assert!(again.is_none());
    }

    #[tokio::test]
    async fn test_missing_roles_are_an_error() {
        let store = MemoryStore::new();
        let err = bootstrap_founder(&store, &founder(), 1).await.unwrap_err();
        assert!(matches!(err, BootstrapError::Role(RoleError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_founder_credentials_are_validated() {
        let store = MemoryStore::new();
        seed_roles(&store).await.unwrap();

        let bad = FounderBootstrap {
            username: "boss@home".into(),
            ..founder()
        };
        let err = bootstrap_founder(&store, &bad, 1).await.unwrap_err();
        assert!(matches!(&err, BootstrapError::InvalidFounder(f) if f == &["username"]));
        assert_eq!(store.list_users(10, 0).await.unwrap().1, 0);

        let short = FounderBootstrap {
            password: "short".into(),
            ..founder()
        };
        let err = bootstrap_founder(&store, &short, 1).await.unwrap_err();
        assert!(!err.to_string().contains("short"));
    }

    #[tokio::test]
    async fn test_founder_email_is_lowercased() {
        let store = MemoryStore::new();
        seed_roles(&store).await.unwrap();

        let founder = FounderBootstrap {
            email: "Founder@Example.COM".into(),
            ..founder()
        };
        let user = bootstrap_founder(&store, &founder, 1)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.email, "founder@example.com");
    }
}
