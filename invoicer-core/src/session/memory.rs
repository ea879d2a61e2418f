//! In-memory session storage
//!
//! Sessions live in a `RwLock<HashMap>` and are lost on restart.

use super::store::{Session, SessionStore};
use crate::error::{StoreError, StoreResult};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory session store
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<String, Session>>> {
        self.sessions
            .read()
            .map_err(|_| StoreError::Invariant("session map lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<String, Session>>> {
        self.sessions
            .write()
            .map_err(|_| StoreError::Invariant("session map lock poisoned".to_string()))
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, id: &str) -> StoreResult<Option<Session>> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn set(&self, session: Session) -> StoreResult<()> {
        self.write()?.insert(session.id.clone(), session);
        Ok(())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.write()?.remove(id);
        Ok(())
    }

    async fn touch(&self, id: &str) -> StoreResult<Option<Session>> {
        Ok(self.write()?.get_mut(id).map(|session| {
            session.touch();
            session.clone()
        }))
    }

    async fn exists(&self, id: &str) -> StoreResult<bool> {
        Ok(self.read()?.contains_key(id))
    }

    async fn cleanup_expired(&self) -> StoreResult<usize> {
        let mut sessions = self.write()?;
        let initial_count = sessions.len();
        sessions.retain(|_, session| !session.is_expired());
        Ok(initial_count - sessions.len())
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemorySessionStore::new();

        let mut session = Session::new("test-123".to_string(), Utc::now() + Duration::hours(1));
        session.set("user_id", "alice").unwrap();
        store.set(session).await.unwrap();

        let retrieved = store.get("test-123").await.unwrap().unwrap();
        assert_eq!(retrieved.id, "test-123");
        assert_eq!(retrieved.get::<String>("user_id"), Some("alice".to_string()));
    }

    #[tokio::test]
    async fn test_memory_store_delete() {
        let store = MemorySessionStore::new();
        let session = Session::new("test-456".to_string(), Utc::now() + Duration::hours(1));

        store.set(session).await.unwrap();
        assert!(store.exists("test-456").await.unwrap());

        store.delete("test-456").await.unwrap();
        assert!(!store.exists("test-456").await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_store_touch() {
        let store = MemorySessionStore::new();
        let session = Session::new("touched".to_string(), Utc::now() + Duration::hours(1));
        let initial_access = session.last_accessed_at;
        store.set(session).await.unwrap();

        std::thread::sleep(std::time::Duration::from_millis(10));
        let touched = store.touch("touched").await.unwrap().unwrap();
        assert!(touched.last_accessed_at > initial_access);
        let stored = store.get("touched").await.unwrap().unwrap();
        assert_eq!(stored.last_accessed_at, touched.last_accessed_at);

        store.delete("touched").await.unwrap();
        assert!(store.touch("touched").await.unwrap().is_none());
        assert!(!store.exists("touched").await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_store_cleanup() {
        let store = MemorySessionStore::new();

        store
            .set(Session::new("expired".to_string(), Utc::now() - Duration::seconds(1)))
            .await
            .unwrap();
        store.set(Session::new("valid".to_string(), Utc::now() + Duration::hours(1))).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 2);

        assert_eq!(store.cleanup_expired().await.unwrap(), 1);
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.exists("valid").await.unwrap());
        assert!(!store.exists("expired").await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_store_concurrent() {
        let store = MemorySessionStore::new();

        let mut handles = vec![];
        for i in 0..10 {
            let store_clone = store.clone();
            handles.push(tokio::spawn(async move {
                let session = Session::new(format!("session-{}", i), Utc::now() + Duration::hours(1));
                store_clone.set(session).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.count().await.unwrap(), 10);
    }
}
