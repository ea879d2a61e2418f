//! Seed accounts for the in-memory credential store

use crate::security::PasswordHasherService;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One `[[users]]` entry
///
/// `password_hash` is an Argon2 PHC string, e.g. the output of
/// `invoicer hash-password`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserConfig {
    pub id: String,
    pub username: String,
    pub password_hash: String,
}

pub fn validate_users(users: &[UserConfig]) -> Result<()> {
    let mut usernames = HashSet::new();
    let mut ids = HashSet::new();

    for user in users {
        if user.username.trim().is_empty() {
            bail!("Invalid user: username cannot be empty");
        }
        if user.id.trim().is_empty() {
            bail!("Invalid user {}: id cannot be empty", user.username);
        }
        if !usernames.insert(user.username.as_str()) {
            bail!("Duplicate username: {}", user.username);
        }
        if !ids.insert(user.id.as_str()) {
            bail!("Duplicate user id: {}", user.id);
        }
        if let Err(e) = PasswordHasherService::validate_hash(&user.password_hash) {
            bail!("Invalid password_hash for {}: {}", user.username, e);
        }
    }

    Ok(())
}
