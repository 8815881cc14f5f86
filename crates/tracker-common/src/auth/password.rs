//! Password hashing and verification
//!
//! Argon2id with a per-hash random salt. Hashing and verification are CPU
//! bound, so `PasswordService` runs them on the blocking thread pool.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use tracker_core::DomainError;

use crate::error::{AppError, AppResult};

/// Hash a password using Argon2id
///
/// # Errors
/// Returns an error if hashing fails
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// Verify a password against a PHC-format hash
///
/// The comparison inside `argon2` is constant time.
///
/// # Errors
/// Returns an error if the stored hash is malformed
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Async facade over the Argon2 primitives
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordService;

impl PasswordService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Hash on the blocking pool
    pub async fn hash(&self, password: String) -> AppResult<String> {
        tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::internal(anyhow::anyhow!("Password hashing task failed: {e}")))?
    }

    /// Verify on the blocking pool
    pub async fn verify(&self, password: String, hash: String) -> AppResult<bool> {
        tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::internal(anyhow::anyhow!("Password verification task failed: {e}")))?
    }
}

/// Validate password strength
///
/// Requires at least 8 characters with an uppercase letter, a lowercase
/// letter and a digit.
///
/// # Errors
/// Returns `DomainError::WeakPassword` naming the first unmet rule
pub fn validate_password_strength(password: &str) -> Result<(), DomainError> {
    let rules: [(bool, &str); 4] = [
        (
            password.chars().count() >= 8,
            "needs at least 8 characters",
        ),
        (
            password.chars().any(char::is_uppercase),
            "needs an uppercase letter",
        ),
        (
            password.chars().any(char::is_lowercase),
            "needs a lowercase letter",
        ),
        (
            password.chars().any(|c| c.is_ascii_digit()),
            "needs a digit",
        ),
    ];

    match rules.iter().find(|(ok, _)| !ok) {
        Some((_, message)) => Err(DomainError::WeakPassword((*message).to_string())),
        None => Ok(()),
    }
}
