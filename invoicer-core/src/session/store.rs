//! Session storage trait and types

use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Session data - flexible key-value store
pub type SessionData = HashMap<String, serde_json::Value>;

const USER_ID_KEY: &str = "user_id";
const USERNAME_KEY: &str = "username";

/// Who a session belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub username: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self { user_id: user_id.into(), username: username.into() }
    }
}

/// User session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session token
    pub id: String,

    /// Session data (flexible key-value store)
    pub data: SessionData,

    pub created_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,

    /// Last access time (refreshed on every authenticated request)
    pub last_accessed_at: DateTime<Utc>,
}

impl Session {
    /// Create a new empty session with the given ID and expiration
    pub fn new(id: String, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self { id, data: HashMap::new(), created_at: now, expires_at, last_accessed_at: now }
    }

    /// Create a session bound to an authenticated identity
    pub fn for_identity(
        id: String,
        identity: &Identity,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<Self> {
        let mut session = Self::new(id, expires_at);
        session.set(USER_ID_KEY, &identity.user_id)?;
        session.set(USERNAME_KEY, &identity.username)?;
        Ok(session)
    }

    /// The identity this session was established for, if any
    pub fn identity(&self) -> Option<Identity> {
        Some(Identity {
            user_id: self.get(USER_ID_KEY)?,
            username: self.get(USERNAME_KEY)?,
        })
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    pub fn touch(&mut self) {
        self.last_accessed_at = Utc::now();
    }

    /// Get a value from session data
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.data.get(key).and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Set a value in session data
    pub fn set<T: Serialize>(&mut self, key: impl Into<String>, value: T) -> StoreResult<()> {
        let json_value = serde_json::to_value(value)
            .map_err(|e| StoreError::Invariant(format!("session value not serializable: {}", e)))?;
        self.data.insert(key.into(), json_value);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.data.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Session storage trait
///
/// Implement this trait to provide a custom session backend.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Get a session by ID
    async fn get(&self, id: &str) -> StoreResult<Option<Session>>;

    /// Store (insert or replace) a session
    async fn set(&self, session: Session) -> StoreResult<()>;

    /// Delete a session by ID
    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// Refresh the last access time of a session that still exists
    ///
    /// Must never re-create a session deleted since it was read; returns
    /// `None` in that case.
    async fn touch(&self, id: &str) -> StoreResult<Option<Session>>;

    async fn exists(&self, id: &str) -> StoreResult<bool> {
        Ok(self.get(id).await?.is_some())
    }

    /// Remove expired sessions, returning how many were deleted
    async fn cleanup_expired(&self) -> StoreResult<usize>;

    async fn count(&self) -> StoreResult<usize>;
}

#[async_trait::async_trait]
impl<S: SessionStore + ?Sized> SessionStore for std::sync::Arc<S> {
    async fn get(&self, id: &str) -> StoreResult<Option<Session>> {
        (**self).get(id).await
    }

    async fn set(&self, session: Session) -> StoreResult<()> {
        (**self).set(session).await
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        (**self).delete(id).await
    }

    async fn touch(&self, id: &str) -> StoreResult<Option<Session>> {
        (**self).touch(id).await
    }

    async fn exists(&self, id: &str) -> StoreResult<bool> {
        (**self).exists(id).await
    }

    async fn cleanup_expired(&self) -> StoreResult<usize> {
        (**self).cleanup_expired().await
    }

    async fn count(&self) -> StoreResult<usize> {
        (**self).count().await
    }
}
