//! Password hashing and verification utilities.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::types::UserError;

/// Hash a password using Argon2id with a fresh random salt. The
/// default parameters carry a work factor suitable for production.
pub fn hash_password(password: &str) -> Result<String, UserError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| UserError::HashingFailed(e.to_string()))?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against its stored hash. Comparison happens
/// inside the argon2 crate with constant-time semantics.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, UserError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| UserError::HashingFailed(e.to_string()))?;

    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(_) => Ok(false),
    }
}
