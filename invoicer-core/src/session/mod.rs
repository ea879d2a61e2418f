//! Session layer
//!
//! - Trait-based session storage with an in-memory backend
//! - Cookie formatting and parsing
//! - Request-side session extraction and session establishment
//! - Background cleanup of expired sessions
//!
//! # Example
//!
//! ```no_run
//! use invoicer_core::session::{MemorySessionStore, SessionConfig, SessionMiddleware};
//! use std::sync::Arc;
//!
//! let config = SessionConfig::new()
//!     .with_cookie_name("app_session")
//!     .with_max_age(std::time::Duration::from_secs(3600 * 24));
//! let middleware = SessionMiddleware::new(Arc::new(MemorySessionStore::new()), config);
//! ```

mod cookie;
mod manager;
mod memory;
mod middleware;
mod store;


pub use cookie::{CookieConfig, SessionCookie};
pub use manager::{SessionManager, SessionManagerConfig};
pub use memory::MemorySessionStore;
pub use middleware::SessionMiddleware;
pub use store::{Identity, Session, SessionData, SessionStore};

use chrono::Duration;
use std::str::FromStr;

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub max_age: Duration,

    /// Read the session token from the session cookie
    pub cookie_enabled: bool,

    /// Read the session token from `Authorization: Bearer`
    pub bearer_enabled: bool,

    pub cookie_config: CookieConfig,
}

/// SameSite cookie policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSitePolicy {
    Strict,
    Lax,
    None,
}

impl SameSitePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSitePolicy::Strict => "Strict",
            SameSitePolicy::Lax => "Lax",
            SameSitePolicy::None => "None",
        }
    }
}

impl FromStr for SameSitePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Strict" => Ok(SameSitePolicy::Strict),
            "Lax" => Ok(SameSitePolicy::Lax),
            "None" => Ok(SameSitePolicy::None),
            other => Err(format!("unknown SameSite policy: {}", other)),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_age: Duration::hours(1),
            cookie_enabled: true,
            bearer_enabled: false,
            cookie_config: CookieConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the `[sessions]` configuration section
    pub fn from_settings(settings: &crate::config::SessionsConfig) -> anyhow::Result<Self> {
        let same_site = settings
            .cookie_same_site
            .parse::<SameSitePolicy>()
            .map_err(anyhow::Error::msg)?;

        Ok(Self::new()
            .with_max_age(std::time::Duration::from_secs(settings.max_age))
            .with_cookie_name(settings.cookie_name.clone())
            .with_secure(settings.cookie_secure)
            .with_http_only(settings.cookie_http_only)
            .with_same_site(same_site)
            .with_bearer_auth(settings.bearer_enabled))
    }

    /// Set maximum age; also drives the cookie `Max-Age`
    pub fn with_max_age(mut self, max_age: std::time::Duration) -> Self {
        self.max_age = Duration::from_std(max_age).unwrap_or(Duration::hours(1));
        self.cookie_config.max_age = Some(self.max_age.num_seconds());
        self
    }

    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_config.name = name.into();
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.cookie_config.secure = secure;
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.cookie_config.http_only = http_only;
        self
    }

    pub fn with_same_site(mut self, same_site: SameSitePolicy) -> Self {
        self.cookie_config.same_site = same_site;
        self
    }

    pub fn with_cookie_auth(mut self, enabled: bool) -> Self {
        self.cookie_enabled = enabled;
        self
    }

    pub fn with_bearer_auth(mut self, enabled: bool) -> Self {
        self.bearer_enabled = enabled;
        self
    }
}
