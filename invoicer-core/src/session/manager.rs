//! Session manager with background cleanup of expired sessions

use super::SessionStore;
use crate::error::StoreResult;
use std::sync::Arc;
use std::time::Duration;

/// Session manager configuration
#[derive(Debug, Clone)]
pub struct SessionManagerConfig {
    /// Run the periodic cleanup task
    pub auto_cleanup: bool,

    /// Interval between cleanup runs
    pub cleanup_interval: Duration,

    /// Log non-empty cleanup runs at info level
    pub log_cleanup: bool,
}

impl Default for SessionManagerConfig {
    fn default() -> Self {
        Self { auto_cleanup: true, cleanup_interval: Duration::from_secs(300), log_cleanup: true }
    }
}

impl SessionManagerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auto_cleanup(mut self, enabled: bool) -> Self {
        self.auto_cleanup = enabled;
        self
    }

    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    pub fn with_log_cleanup(mut self, enabled: bool) -> Self {
        self.log_cleanup = enabled;
        self
    }
}

/// Owns a session store and its cleanup task
///
/// Must be created inside a Tokio runtime when `auto_cleanup` is on. The task
/// is aborted when the manager is dropped.
pub struct SessionManager<S: SessionStore + ?Sized> {
    store: Arc<S>,
    cleanup_task: Option<tokio::task::JoinHandle<()>>,
    config: SessionManagerConfig,
}

impl<S: SessionStore + ?Sized + 'static> SessionManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, SessionManagerConfig::default())
    }

    pub fn with_config(store: Arc<S>, config: SessionManagerConfig) -> Self {
        let cleanup_task = if config.auto_cleanup {
            let cleanup_store = store.clone();
            let interval = config.cleanup_interval;
            let log_cleanup = config.log_cleanup;

            Some(tokio::spawn(async move {
                let mut interval_timer = tokio::time::interval(interval);
                loop {
                    interval_timer.tick().await;

                    match cleanup_store.cleanup_expired().await {
                        Ok(count) if count > 0 && log_cleanup => {
                            log::info!("Cleaned up {} expired sessions", count);
                        }
                        Ok(_) => {}
                        Err(e) => {
                            log::error!("Session cleanup failed: {}", e);
                        }
                    }
                }
            }))
        } else {
            None
        };

        Self { store, cleanup_task, config }
    }

    pub fn store(&self) -> Arc<S> {
        Arc::clone(&self.store)
    }

    pub fn config(&self) -> &SessionManagerConfig {
        &self.config
    }

    /// Run a cleanup pass now, in addition to the periodic one
    pub async fn cleanup_now(&self) -> StoreResult<usize> {
        self.store.cleanup_expired().await
    }

    pub async fn session_count(&self) -> StoreResult<usize> {
        self.store.count().await
    }
}

impl<S: SessionStore + ?Sized> Drop for SessionManager<S> {
    fn drop(&mut self) {
        if let Some(task) = self.cleanup_task.take() {
            task.abort();
        }
    }
}
