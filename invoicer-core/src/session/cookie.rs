//! Session cookie formatting and parsing

use super::SameSitePolicy;

/// Cookie configuration
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,

    pub domain: Option<String>,

    pub path: String,

    /// Secure flag (HTTPS only)
    pub secure: bool,

    /// HttpOnly flag (no JavaScript access)
    pub http_only: bool,

    pub same_site: SameSitePolicy,

    /// Max age in seconds
    pub max_age: Option<i64>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "invoicer_session".to_string(),
            domain: None,
            path: "/".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSitePolicy::Lax,
            max_age: Some(3600),
        }
    }
}

/// Session cookie builder
#[derive(Debug, Clone)]
pub struct SessionCookie {
    config: CookieConfig,
}

impl SessionCookie {
    pub fn new(config: CookieConfig) -> Self {
        Self { config }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Build a Set-Cookie header value carrying the session token
    pub fn build_set_cookie(&self, session_id: &str) -> String {
        let mut parts = vec![format!("{}={}", self.config.name, session_id)];

        if let Some(ref domain) = self.config.domain {
            parts.push(format!("Domain={}", domain));
        }

        parts.push(format!("Path={}", self.config.path));

        if let Some(max_age) = self.config.max_age {
            parts.push(format!("Max-Age={}", max_age));
        }

        if self.config.secure {
            parts.push("Secure".to_string());
        }

        if self.config.http_only {
            parts.push("HttpOnly".to_string());
        }

        parts.push(format!("SameSite={}", self.config.same_site.as_str()));

        parts.join("; ")
    }

    /// Build a Set-Cookie header value that clears the session cookie
    pub fn build_delete_cookie(&self) -> String {
        format!("{}=; Path={}; Max-Age=0", self.config.name, self.config.path)
    }

    /// Extract the session token from a Cookie header
    pub fn extract_from_header(&self, cookie_header: &str) -> Option<String> {
        let prefix = format!("{}=", self.config.name);
        cookie_header.split(';').find_map(|cookie| {
            cookie
                .trim()
                .strip_prefix(&prefix)
                .filter(|value| !value.is_empty())
                .map(|value| value.to_string())
        })
    }
}
