//! Credential lookup

use crate::config::UserConfig;
use crate::error::StoreResult;
use std::collections::HashMap;
use std::sync::Arc;

/// A stored account as the authenticator sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    pub user_id: String,
    pub username: String,
    /// Argon2 PHC string
    pub password_hash: String,
}

/// Credential lookup by username
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    /// `Ok(None)` when the username is unknown
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<StoredCredential>>;
}

#[async_trait::async_trait]
impl<S: CredentialStore + ?Sized> CredentialStore for Arc<S> {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<StoredCredential>> {
        (**self).find_by_username(username).await
    }
}

/// Immutable in-memory credential store, keyed by username
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    users: Arc<HashMap<String, StoredCredential>>,
}

impl MemoryCredentialStore {
    pub fn new(credentials: impl IntoIterator<Item = StoredCredential>) -> Self {
        let users = credentials.into_iter().map(|c| (c.username.clone(), c)).collect();
        Self { users: Arc::new(users) }
    }

    /// Build from `[[users]]` config entries
    pub fn from_config(users: &[UserConfig]) -> Self {
        Self::new(users.iter().map(|u| StoredCredential {
            user_id: u.id.clone(),
            username: u.username.clone(),
            password_hash: u.password_hash.clone(),
        }))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait::async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<StoredCredential>> {
        Ok(self.users.get(username).cloned())
    }
}
