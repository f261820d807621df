//! Password hashing with Argon2id.

use std::sync::OnceLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use super::error::{AuthError, AuthResult};

/// Argon2id with the given time cost and default memory and parallelism.
fn hasher(time_cost: u32) -> AuthResult<Argon2<'static>> {
    let params = Params::new(
        Params::DEFAULT_M_COST,
        time_cost,
        Params::DEFAULT_P_COST,
        None,
    )
    .map_err(|_| AuthError::PasswordHash)?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a password into a PHC string.
pub fn hash_password(password: &str, time_cost: u32) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher(time_cost)?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AuthError::PasswordHash)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC string.
///
/// Parameters are read from the hash itself, so hashes made with an older
/// cost keep verifying after the setting changes.
pub fn verify_password(password: &str, hash: &str) -> AuthResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

/// Burn one verification against a fixed hash.
///
/// Called when the login identifier matches no account, so that path costs
/// the same as a wrong password.
pub fn verify_dummy(password: &str, time_cost: u32) {
    let dummy = DUMMY_HASH.get_or_init(|| hash_password("wiki-dummy-password", time_cost).ok());
    if let Some(hash) = dummy {
        let _ = verify_password(password, hash);
    }
}
