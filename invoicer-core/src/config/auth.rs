//! Route gating and login configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Auth configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Login form path
    /// Env: INVOICER_LOGIN_PATH
    /// Default: "/login"
    pub login_path: String,

    /// Path namespace that requires a session
    /// Env: INVOICER_PROTECTED_PREFIX
    /// Default: "/dashboard"
    pub protected_prefix: String,

    /// Where authenticated users are sent
    /// Env: INVOICER_LANDING_ROUTE
    /// Default: "/dashboard"
    pub landing_route: String,

    /// Requests whose path starts with one of these never reach the gate
    /// Env: INVOICER_BYPASS_PREFIXES (comma-separated)
    /// Default: ["/api", "/static"]
    pub bypass_prefixes: Vec<String>,

    /// Requests whose path ends with one of these never reach the gate
    /// Env: INVOICER_BYPASS_SUFFIXES (comma-separated)
    /// Default: [".png"]
    pub bypass_suffixes: Vec<String>,

    /// Shortest password accepted by form validation
    /// Env: INVOICER_MIN_PASSWORD_LENGTH
    /// Default: 6
    pub min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            protected_prefix: "/dashboard".to_string(),
            landing_route: "/dashboard".to_string(),
            bypass_prefixes: vec!["/api".to_string(), "/static".to_string()],
            bypass_suffixes: vec![".png".to_string()],
            min_password_length: 6,
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
}

impl AuthConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        self.apply_env_from(|key| env::var(key).ok());
    }

    /// Apply `INVOICER_*` overrides resolved through `var`
    pub fn apply_env_from(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(path) = var("INVOICER_LOGIN_PATH") {
            self.login_path = path;
        }

        if let Some(prefix) = var("INVOICER_PROTECTED_PREFIX") {
            self.protected_prefix = prefix;
        }

        if let Some(route) = var("INVOICER_LANDING_ROUTE") {
            self.landing_route = route;
        }

        if let Some(prefixes) = var("INVOICER_BYPASS_PREFIXES") {
            self.bypass_prefixes = split_list(&prefixes);
        }

        if let Some(suffixes) = var("INVOICER_BYPASS_SUFFIXES") {
            self.bypass_suffixes = split_list(&suffixes);
        }

        if let Some(len) = var("INVOICER_MIN_PASSWORD_LENGTH") {
            if let Ok(l) = len.parse() {
                self.min_password_length = l;
            }
        }
    }

    /// Whether the gate's matcher skips `path`
    pub fn is_bypassed(&self, path: &str) -> bool {
        self.bypass_prefixes.iter().any(|p| path.starts_with(p.as_str()))
            || self.bypass_suffixes.iter().any(|s| path.ends_with(s.as_str()))
    }

    pub fn validate(&self) -> Result<()> {
        for (name, path) in [
            ("login_path", &self.login_path),
            ("protected_prefix", &self.protected_prefix),
            ("landing_route", &self.landing_route),
        ] {
            if !path.starts_with('/') {
                bail!("Invalid {}: must start with '/'", name);
            }
        }

        if self.protected_prefix == "/" {
            bail!("Invalid protected_prefix: cannot protect the whole site");
        }

        if !self.landing_route.starts_with(&self.protected_prefix) {
            bail!("Invalid landing_route: must lie under protected_prefix");
        }

        // An authenticated user is redirected away from every public path,
        // so a protected login path would redirect forever.
        if self.login_path.starts_with(&self.protected_prefix) {
            bail!("Invalid login_path: cannot lie under protected_prefix");
        }

        if self.bypass_prefixes.iter().any(|p| self.protected_prefix.starts_with(p.as_str())) {
            bail!("Invalid bypass_prefixes: would expose the protected area");
        }

        // The gate never runs on bypassed paths, so a signed-in user would
        // be shown the login page or an ungated landing route.
        for (name, path) in [("login_path", &self.login_path), ("landing_route", &self.landing_route)]
        {
            if self.is_bypassed(path) {
                bail!("Invalid {}: matched by bypass_prefixes or bypass_suffixes", name);
            }
        }

        if self.min_password_length == 0 {
            bail!("Invalid min_password_length: must be at least 1");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(AuthConfig::default().validate().is_ok());
    }

    #[test]
    fn test_landing_route_outside_prefix_rejected() {
        let cfg = AuthConfig { landing_route: "/home".to_string(), ..Default::default() };
        assert!(cfg.validate().unwrap_err().to_string().contains("landing_route"));
    }

    #[test]
    fn test_login_under_prefix_rejected() {
        let cfg = AuthConfig { login_path: "/dashboard/login".to_string(), ..Default::default() };
        assert!(cfg.validate().unwrap_err().to_string().contains("login_path"));
    }

    #[test]
    fn test_relative_path_rejected() {
        let cfg = AuthConfig { login_path: "login".to_string(), ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_bypass_cannot_cover_protected_area() {
        let cfg = AuthConfig { bypass_prefixes: vec!["/dash".to_string()], ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_bypassed_login_path_rejected() {
        let cfg = AuthConfig { login_path: "/api/login".to_string(), ..Default::default() };
        assert!(cfg.validate().unwrap_err().to_string().contains("login_path"));

        let cfg = AuthConfig { login_path: "/signin.png".to_string(), ..Default::default() };
        assert!(cfg.validate().unwrap_err().to_string().contains("login_path"));
    }

    #[test]
    fn test_bypassed_landing_route_rejected() {
        let cfg = AuthConfig {
            landing_route: "/dashboard/logo.png".to_string(),
            ..Default::default()
        };
        assert!(cfg.validate().unwrap_err().to_string().contains("landing_route"));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("/api, /assets ,,"), vec!["/api", "/assets"]);
    }

    #[test]
    fn test_apply_env_vars_bypass() {
        let mut cfg = AuthConfig::default();
        cfg.apply_env_from(|key| {
            (key == "INVOICER_BYPASS_SUFFIXES").then(|| ".png,.svg".to_string())
        });
        assert_eq!(cfg.bypass_suffixes, vec![".png", ".svg"]);
        assert_eq!(cfg.bypass_prefixes, vec!["/api", "/static"]);
    }
}
