//! Password hashing for stored credentials
//!
//! Hashes are Argon2id PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`).
//! Verification reads the parameters from the stored hash, so hashes produced
//! with different cost settings all verify through the same service.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

/// Argon2id hasher and verifier
#[derive(Clone)]
pub struct PasswordHasherService {
    argon2: Argon2<'static>,
}

impl Default for PasswordHasherService {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PasswordHasherService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasherService").finish_non_exhaustive()
    }
}

impl PasswordHasherService {
    /// Argon2id with the crate defaults (19 MiB, 2 iterations, 1 lane)
    pub fn new() -> Self {
        Self { argon2: Argon2::default() }
    }

    /// Argon2id with explicit cost parameters
    ///
    /// `memory_kib` must be at least `8 * parallelism`.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;
        Ok(Self { argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params) })
    }

    /// Hash a password with a fresh random salt
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

        Ok(password_hash.to_string())
    }

    /// Verify a password against a stored PHC hash
    ///
    /// `Ok(false)` means a well-formed hash that does not match. A hash that
    /// cannot be parsed is an error, not a mismatch.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
        }
    }

    /// Check that a string is a parseable PHC hash
    pub fn validate_hash(hash: &str) -> Result<(), PasswordError> {
        PasswordHash::new(hash).map(|_| ()).map_err(|e| PasswordError::InvalidHash(e.to_string()))
    }

    /// Whether a stored hash was produced by something other than Argon2id
    pub fn needs_rehash(&self, hash: &str) -> bool {
        !hash.starts_with("$argon2id$")
    }
}

/// Password hashing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    HashingFailed(String),
    #[error("invalid password hash: {0}")]
    InvalidHash(String),
    #[error("password verification failed: {0}")]
    VerificationFailed(String),
}

/// Hash with default parameters
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    PasswordHasherService::new().hash_password(password)
}
