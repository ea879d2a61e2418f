//! Sessions configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Ten years, in seconds
pub const MAX_SESSION_AGE: u64 = 10 * 365 * 24 * 60 * 60;

/// Sessions configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionsConfig {
    /// Session maximum age in seconds
    /// Env: INVOICER_SESSION_MAX_AGE
    /// Default: 3600 (1 hour)
    pub max_age: u64,

    /// Run the periodic expired-session cleanup
    /// Env: INVOICER_SESSION_AUTO_CLEANUP
    /// Default: true
    pub auto_cleanup: bool,

    /// Session cleanup interval in seconds
    /// Env: INVOICER_SESSION_CLEANUP_INTERVAL
    /// Default: 300 (5 minutes)
    pub cleanup_interval: u64,

    /// Session cookie name
    /// Env: INVOICER_SESSION_COOKIE_NAME
    /// Default: "invoicer_session"
    pub cookie_name: String,

    /// Set Secure flag on cookies (HTTPS only)
    /// Env: INVOICER_SESSION_COOKIE_SECURE
    /// Default: true
    pub cookie_secure: bool,

    /// Set HttpOnly flag on cookies
    /// Env: INVOICER_SESSION_COOKIE_HTTPONLY
    /// Default: true
    pub cookie_http_only: bool,

    /// SameSite policy: "Strict", "Lax", or "None"
    /// Env: INVOICER_SESSION_COOKIE_SAMESITE
    /// Default: "Lax"
    pub cookie_same_site: String,

    /// Also accept `Authorization: Bearer <token>`
    /// Env: INVOICER_SESSION_BEARER_ENABLED
    /// Default: false
    pub bearer_enabled: bool,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            max_age: 3600,
            auto_cleanup: true,
            cleanup_interval: 300,
            cookie_name: "invoicer_session".to_string(),
            cookie_secure: true,
            cookie_http_only: true,
            cookie_same_site: "Lax".to_string(),
            bearer_enabled: false,
        }
    }
}

impl SessionsConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        self.apply_env_from(|key| env::var(key).ok());
    }

    pub fn apply_env_from(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(max_age) = var("INVOICER_SESSION_MAX_AGE") {
            if let Ok(m) = max_age.parse() {
                self.max_age = m;
            }
        }

        if let Some(enabled) = var("INVOICER_SESSION_AUTO_CLEANUP") {
            self.auto_cleanup = enabled.parse().unwrap_or(true);
        }

        if let Some(interval) = var("INVOICER_SESSION_CLEANUP_INTERVAL") {
            if let Ok(i) = interval.parse() {
                self.cleanup_interval = i;
            }
        }

        if let Some(name) = var("INVOICER_SESSION_COOKIE_NAME") {
            self.cookie_name = name;
        }

        if let Some(secure) = var("INVOICER_SESSION_COOKIE_SECURE") {
            self.cookie_secure = secure.parse().unwrap_or(true);
        }

        if let Some(httponly) = var("INVOICER_SESSION_COOKIE_HTTPONLY") {
            self.cookie_http_only = httponly.parse().unwrap_or(true);
        }

        if let Some(samesite) = var("INVOICER_SESSION_COOKIE_SAMESITE") {
            self.cookie_same_site = samesite;
        }

        if let Some(bearer) = var("INVOICER_SESSION_BEARER_ENABLED") {
            self.bearer_enabled = bearer.parse().unwrap_or(false);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_age == 0 || self.max_age > MAX_SESSION_AGE {
            bail!("Invalid max_age: must be between 1 and {} seconds", MAX_SESSION_AGE);
        }

        if self.auto_cleanup && self.cleanup_interval == 0 {
            bail!("Invalid cleanup_interval: must be greater than 0");
        }

        if self.cookie_name.is_empty()
            || self.cookie_name.contains(|c: char| c == '=' || c == ';' || c.is_whitespace())
        {
            bail!("Invalid cookie_name: must be a non-empty cookie token");
        }

        if !["Strict", "Lax", "None"].contains(&self.cookie_same_site.as_str()) {
            bail!("Invalid cookie_same_site: must be Strict, Lax, or None");
        }

        if self.cookie_same_site == "None" && !self.cookie_secure {
            bail!("cookie_same_site = \"None\" requires cookie_secure = true");
        }

        Ok(())
    }
}
