//! Authorization gate
//!
//! Decides, before any handler runs, whether a request may proceed. The
//! protected prefix is the only gate: everything outside it is open to
//! anonymous visitors, and authenticated visitors are sent back to the
//! protected area's landing route.

use crate::config::AuthConfig;

/// Outcome of gating one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationDecision {
    /// Continue to the handler
    Allow,
    /// Protected path without a session
    DenyRedirectToLogin,
    /// Public path with a session
    RedirectAuthenticatedAwayFromLogin,
}

/// Route gate configured with the protected prefix and the redirect targets
#[derive(Debug, Clone)]
pub struct RouteGate {
    protected_prefix: String,
    login_path: String,
    landing_route: String,
    bypass_prefixes: Vec<String>,
    bypass_suffixes: Vec<String>,
}

impl RouteGate {
    pub fn new(
        protected_prefix: impl Into<String>,
        login_path: impl Into<String>,
        landing_route: impl Into<String>,
    ) -> Self {
        Self {
            protected_prefix: protected_prefix.into(),
            login_path: login_path.into(),
            landing_route: landing_route.into(),
            bypass_prefixes: Vec::new(),
            bypass_suffixes: Vec::new(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.protected_prefix, &config.login_path, &config.landing_route)
            .with_bypass(config.bypass_prefixes.clone(), config.bypass_suffixes.clone())
    }

    /// Paths the gate never runs on
    pub fn with_bypass(mut self, prefixes: Vec<String>, suffixes: Vec<String>) -> Self {
        self.bypass_prefixes = prefixes;
        self.bypass_suffixes = suffixes;
        self
    }

    /// Whether the gate runs on this path at all
    pub fn applies_to(&self, path: &str) -> bool {
        let bypassed = self.bypass_prefixes.iter().any(|p| path.starts_with(p.as_str()))
            || self.bypass_suffixes.iter().any(|s| path.ends_with(s.as_str()));
        !bypassed
    }

    pub fn is_protected(&self, path: &str) -> bool {
        path.starts_with(&self.protected_prefix)
    }

    /// Decide from session presence and the requested path
    pub fn evaluate(&self, session_present: bool, path: &str) -> AuthorizationDecision {
        match (self.is_protected(path), session_present) {
            (true, true) => AuthorizationDecision::Allow,
            (true, false) => AuthorizationDecision::DenyRedirectToLogin,
            (false, true) => AuthorizationDecision::RedirectAuthenticatedAwayFromLogin,
            (false, false) => AuthorizationDecision::Allow,
        }
    }

    /// Where a decision sends the client, if anywhere
    pub fn redirect_target(&self, decision: AuthorizationDecision) -> Option<&str> {
        match decision {
            AuthorizationDecision::Allow => None,
            AuthorizationDecision::DenyRedirectToLogin => Some(&self.login_path),
            AuthorizationDecision::RedirectAuthenticatedAwayFromLogin => Some(&self.landing_route),
        }
    }

    pub fn protected_prefix(&self) -> &str {
        &self.protected_prefix
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn landing_route(&self) -> &str {
        &self.landing_route
    }
}
