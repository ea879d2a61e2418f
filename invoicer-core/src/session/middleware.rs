//! Request-side session handling

use super::cookie::SessionCookie;
use super::{Identity, Session, SessionConfig, SessionStore};
use crate::error::{StoreError, StoreResult};
use http::Request;
use std::sync::Arc;
use uuid::Uuid;

/// Reads the current session from requests and establishes new ones
///
/// Tokens come from the session cookie first, then from an
/// `Authorization: Bearer` header when bearer auth is enabled.
pub struct SessionMiddleware {
    store: Arc<dyn SessionStore>,
    config: SessionConfig,
    cookie: SessionCookie,
}

impl SessionMiddleware {
    pub fn new(store: Arc<dyn SessionStore>, config: SessionConfig) -> Self {
        let cookie = SessionCookie::new(config.cookie_config.clone());
        Self { store, config, cookie }
    }

    /// Load the live session attached to a request
    ///
    /// Unknown tokens yield `None`. Expired sessions are deleted and also
    /// yield `None`. A live session has its last-access time refreshed.
    pub async fn extract_session<B>(&self, req: &Request<B>) -> StoreResult<Option<Session>> {
        let Some(id) = self.extract_session_id(req) else {
            return Ok(None);
        };

        let Some(session) = self.store.get(&id).await? else {
            log::debug!("Session token not found in store");
            return Ok(None);
        };

        if session.is_expired() {
            self.store.delete(&id).await?;
            log::debug!("Dropped expired session");
            return Ok(None);
        }

        // A logout can land between the read above and this refresh.
        let touched = self.store.touch(&id).await?;
        if touched.is_none() {
            log::debug!("Session ended while being read");
        }

        Ok(touched)
    }

    /// Create and persist a session for an authenticated identity
    pub async fn establish(&self, identity: &Identity) -> StoreResult<Session> {
        let session_id = Uuid::new_v4().to_string();
        let expires_at =
            chrono::Utc::now().checked_add_signed(self.config.max_age).ok_or_else(|| {
                StoreError::Invariant(format!(
                    "session max_age of {}s overflows the expiry timestamp",
                    self.config.max_age.num_seconds()
                ))
            })?;

        let session = Session::for_identity(session_id, identity, expires_at)?;
        self.store.set(session.clone()).await?;

        Ok(session)
    }

    /// Delete a session
    pub async fn destroy(&self, session_id: &str) -> StoreResult<()> {
        self.store.delete(session_id).await
    }

    /// `Set-Cookie` value attaching a session to subsequent requests
    pub fn set_cookie_header(&self, session: &Session) -> String {
        self.cookie.build_set_cookie(&session.id)
    }

    /// `Set-Cookie` value clearing the session cookie
    pub fn clear_cookie_header(&self) -> String {
        self.cookie.build_delete_cookie()
    }

    fn extract_session_id<B>(&self, req: &Request<B>) -> Option<String> {
        if self.config.cookie_enabled {
            let from_cookie = req
                .headers()
                .get(http::header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .and_then(|header| self.cookie.extract_from_header(header));
            if from_cookie.is_some() {
                return from_cookie;
            }
        }

        if self.config.bearer_enabled {
            return req
                .headers()
                .get(http::header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());
        }

        None
    }
}
