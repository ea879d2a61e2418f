//! Builder for InvoicerApp

use super::InvoicerApp;
use crate::auth::{CredentialAuthenticator, CredentialStore, MemoryCredentialStore, RouteGate};
use crate::config::InvoicerConfig;
use crate::invoice::{InvoiceActions, InvoiceStore, MemoryInvoiceStore};
use crate::security::PasswordHasherService;
use crate::session::{
    MemorySessionStore, SessionConfig, SessionManager, SessionManagerConfig, SessionMiddleware,
    SessionStore,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

/// Wires stores, session layer and gate into an [`InvoicerApp`]
///
/// Stores not supplied explicitly default to the in-memory implementations,
/// with credentials seeded from `[[users]]`.
pub struct InvoicerAppBuilder {
    config: InvoicerConfig,
    credentials: Option<Arc<dyn CredentialStore>>,
    sessions: Option<Arc<dyn SessionStore>>,
    invoices: Option<Arc<dyn InvoiceStore>>,
    hasher: Option<PasswordHasherService>,
}

impl InvoicerAppBuilder {
    pub fn new(config: InvoicerConfig) -> Self {
        Self { config, credentials: None, sessions: None, invoices: None, hasher: None }
    }

    pub fn with_credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.credentials = Some(store);
        self
    }

    pub fn with_session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.sessions = Some(store);
        self
    }

    pub fn with_invoice_store(mut self, store: Arc<dyn InvoiceStore>) -> Self {
        self.invoices = Some(store);
        self
    }

    /// Hasher used for password verification (must match the stored hashes' algorithm)
    pub fn with_password_hasher(mut self, hasher: PasswordHasherService) -> Self {
        self.hasher = Some(hasher);
        self
    }

    /// Validate the configuration and assemble the app
    ///
    /// Must run inside a Tokio runtime when session auto-cleanup is enabled.
    pub fn build(self) -> Result<InvoicerApp> {
        let config = self.config;
        config.validate()?;

        let credentials: Arc<dyn CredentialStore> = match self.credentials {
            Some(store) => store,
            None => Arc::new(MemoryCredentialStore::from_config(&config.users)),
        };
        let session_store: Arc<dyn SessionStore> = match self.sessions {
            Some(store) => store,
            None => Arc::new(MemorySessionStore::new()),
        };
        let invoice_store: Arc<dyn InvoiceStore> = match self.invoices {
            Some(store) => store,
            None => Arc::new(MemoryInvoiceStore::new()),
        };

        let session_manager = SessionManager::with_config(
            session_store.clone(),
            SessionManagerConfig::new()
                .with_auto_cleanup(config.sessions.auto_cleanup)
                .with_cleanup_interval(Duration::from_secs(config.sessions.cleanup_interval)),
        );

        let session_config = SessionConfig::from_settings(&config.sessions)?;
        let sessions = Arc::new(SessionMiddleware::new(session_store, session_config));

        let hasher = self.hasher.unwrap_or_default();
        let authenticator =
            CredentialAuthenticator::with_hasher(credentials, sessions.clone(), hasher)
                .context("Failed to prepare credential authenticator")?;

        let gate = RouteGate::from_config(&config.auth);
        let invoices = InvoiceActions::new(invoice_store, &config.auth.protected_prefix);

        log::info!(
            "App ready: protected prefix {}, login {}, {} seeded user(s)",
            gate.protected_prefix(),
            gate.login_path(),
            config.users.len()
        );

        Ok(InvoicerApp {
            gate,
            sessions,
            authenticator,
            invoices,
            min_password_length: config.auth.min_password_length,
            max_body_size: config.server.max_body_size,
            _session_manager: session_manager,
        })
    }
}
