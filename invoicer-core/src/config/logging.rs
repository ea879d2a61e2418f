//! Logging configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// env_logger filter string, e.g. "info" or "invoicer_core=debug,hyper=warn"
    /// Env: INVOICER_LOG_LEVEL
    pub level: String,

    /// "human" or "json"
    /// Env: INVOICER_LOG_FORMAT
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "human".to_string() }
    }
}

impl LoggingConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        self.apply_env_from(|key| env::var(key).ok());
    }

    pub fn apply_env_from(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(level) = var("INVOICER_LOG_LEVEL") {
            self.level = level;
        }
        if let Some(format) = var("INVOICER_LOG_FORMAT") {
            self.format = format;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.level.trim().is_empty() {
            bail!("Invalid logging level: cannot be empty");
        }
        if !["human", "json"].contains(&self.format.as_str()) {
            bail!("Invalid logging format: must be human or json");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_format_rejected() {
        let cfg = LoggingConfig { format: "xml".to_string(), ..Default::default() };
        assert!(cfg.validate().is_err());
        assert!(LoggingConfig::default().validate().is_ok());
    }
}
