//! Password hashing with Argon2id

use super::jwt::AuthError;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use catalog_core::PasswordConfig;
use tracing::warn;

/// Hash `password` with a fresh random salt into a PHC string
pub fn hash(password: &str, config: &PasswordConfig) -> Result<String, AuthError> {
    let params = Params::new(
        config.memory_kib,
        config.iterations,
        config.parallelism,
        None,
    )
    .map_err(|e| {
        warn!("Invalid argon2 parameters: {}", e);
        AuthError::Hashing
    })?;

    let salt = SaltString::generate(&mut OsRng);
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            warn!("Failed to hash password: {}", e);
            AuthError::Hashing
        })
}

/// Check `password` against a stored PHC string.
///
/// Salt and cost come from the hash itself. Empty passwords and unparsable
/// hashes never match.
pub fn verify(password: &str, hash: &str) -> bool {
    if password.is_empty() {
        return false;
    }
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// [`hash`] on the blocking pool
pub async fn hash_blocking(password: String, config: PasswordConfig) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hash(&password, &config))
        .await
        .map_err(|e| {
            warn!("Password hashing task failed: {}", e);
            AuthError::Hashing
        })?
}

/// [`verify`] on the blocking pool; a failed task counts as a mismatch
pub async fn verify_blocking(password: String, hash: String) -> bool {
    tokio::task::spawn_blocking(move || verify(&password, &hash))
        .await
        .unwrap_or(false)
}
