use anyhow::{bail, Result};
use invoicer_core::security::hash_password;

/// Hash a password for a `[[users]]` entry.
pub fn run(password: &str) -> Result<String> {
    if password.is_empty() {
        bail!("Password cannot be empty");
    }
    Ok(hash_password(password)?)
}
