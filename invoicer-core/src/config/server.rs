//! Server configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listening address
    /// Env: INVOICER_HOST
    /// Default: "127.0.0.1"
    pub host: String,

    /// Listening port
    /// Env: INVOICER_PORT
    /// Default: 3000
    pub port: u16,

    /// Maximum request body size in bytes
    /// Env: INVOICER_MAX_BODY_SIZE
    /// Default: 65536
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 3000, max_body_size: 64 * 1024 }
    }
}

impl ServerConfig {
    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        self.apply_env_from(|key| env::var(key).ok());
    }

    /// Apply `INVOICER_*` overrides resolved through `var`
    pub fn apply_env_from(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(host) = var("INVOICER_HOST") {
            self.host = host;
        }

        if let Some(port) = var("INVOICER_PORT") {
            if let Ok(p) = port.parse() {
                self.port = p;
            }
        }

        if let Some(size) = var("INVOICER_MAX_BODY_SIZE") {
            if let Ok(s) = size.parse() {
                self.max_body_size = s;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            bail!("Invalid port: port must be between 1 and 65535");
        }

        if self.host.is_empty() {
            bail!("Invalid host: host cannot be empty");
        }

        if self.max_body_size == 0 {
            bail!("Invalid max_body_size: must be greater than 0");
        }

        Ok(())
    }

    /// `host:port` for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
