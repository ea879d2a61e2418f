//! Credential hashing
//!
//! Password hashes are Argon2id (OWASP recommended) PHC strings.

pub mod password;

pub use password::{hash_password, PasswordError, PasswordHasherService};
