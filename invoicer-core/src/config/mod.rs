//! Configuration system
//!
//! Values are resolved in the following order (highest priority wins):
//!
//! 1. **Environment Variables** (`INVOICER_*`)
//! 2. **Config File** (`invoicer.toml`)
//! 3. **Defaults**
//!
//! # Example
//!
//! ```no_run
//! use invoicer_core::config::InvoicerConfig;
//!
//! let config = InvoicerConfig::load()?;
//! config.validate()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod auth;
pub mod logging;
pub mod server;
pub mod sessions;
pub mod users;

pub use auth::AuthConfig;
pub use logging::LoggingConfig;
pub use server::ServerConfig;
pub use sessions::SessionsConfig;
pub use users::UserConfig;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "invoicer.toml";

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoicerConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub sessions: SessionsConfig,
    pub logging: LoggingConfig,
    pub users: Vec<UserConfig>,
}

impl InvoicerConfig {
    /// Load `invoicer.toml` (if present) and apply environment overrides
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load from a specific file (if present) and apply environment overrides
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config = Self::default();

        if path.exists() {
            let file_config = Self::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.merge(file_config);
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
        }

        config.apply_env_vars();

        Ok(config)
    }

    /// Parse a TOML file without environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.as_ref().display()))
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        self.server.merge(other.server);
        self.auth.merge(other.auth);
        self.sessions.merge(other.sessions);
        self.logging.merge(other.logging);
        self.users = other.users;
    }

    pub fn apply_env_vars(&mut self) {
        self.server.apply_env_vars();
        self.auth.apply_env_vars();
        self.sessions.apply_env_vars();
        self.logging.apply_env_vars();
    }

    pub fn validate(&self) -> Result<()> {
        self.server.validate().context("[server]")?;
        self.auth.validate().context("[auth]")?;
        self.sessions.validate().context("[sessions]")?;
        self.logging.validate().context("[logging]")?;
        users::validate_users(&self.users).context("[[users]]")?;
        Ok(())
    }
}
