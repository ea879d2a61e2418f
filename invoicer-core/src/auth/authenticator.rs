//! Credential authenticator
//!
//! One call walks `Idle -> Validating -> Authenticated | Rejected(reason)`.
//! Store and session-layer failures collapse into `Rejected(Unknown)` after
//! being logged for operators; `StoreError::Invariant` is returned as `Err`.

use super::credentials::{Credentials, ValidationError};
use super::store::CredentialStore;
use crate::error::StoreError;
use crate::security::{PasswordError, PasswordHasherService};
use crate::session::{Identity, Session, SessionMiddleware};
use std::sync::Arc;

/// Why a well-formed login attempt was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Unknown username or wrong password
    InvalidCredentials,
    /// Something failed while validating
    Unknown,
}

impl RejectReason {
    pub fn user_message(&self) -> &'static str {
        match self {
            RejectReason::InvalidCredentials => "Invalid credentials.",
            RejectReason::Unknown => "Something went wrong.",
        }
    }
}

/// Result of one authentication attempt
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    /// A session was created and stored
    Authenticated(Session),
    /// No session was created
    Rejected(RejectReason),
}

/// What the login form shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginState {
    Idle,
    Invalid(ValidationError),
    Rejected(RejectReason),
}

impl LoginState {
    /// The single message rendered with the form, if any
    pub fn message(&self) -> Option<&'static str> {
        match self {
            LoginState::Idle => None,
            LoginState::Invalid(e) => Some(e.user_message()),
            LoginState::Rejected(reason) => Some(reason.user_message()),
        }
    }
}

/// Validates credentials against a store and establishes sessions
pub struct CredentialAuthenticator {
    credentials: Arc<dyn CredentialStore>,
    sessions: Arc<SessionMiddleware>,
    hasher: PasswordHasherService,
    // Verified against when the username is unknown, so both rejection
    // paths pay for one hash verification.
    dummy_hash: String,
}

impl CredentialAuthenticator {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        sessions: Arc<SessionMiddleware>,
    ) -> Result<Self, PasswordError> {
        Self::with_hasher(credentials, sessions, PasswordHasherService::new())
    }

    pub fn with_hasher(
        credentials: Arc<dyn CredentialStore>,
        sessions: Arc<SessionMiddleware>,
        hasher: PasswordHasherService,
    ) -> Result<Self, PasswordError> {
        let dummy_hash = hasher.hash_password("invoicer-dummy-password")?;
        Ok(Self { credentials, sessions, hasher, dummy_hash })
    }

    /// Check a credential pair and, on success, establish a session
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<LoginOutcome, StoreError> {
        let username = credentials.username();
        log::debug!("Validating credentials for {}", username);

        let stored = match self.credentials.find_by_username(username).await {
            Ok(stored) => stored,
            Err(e) => return self.unknown(username, "credential lookup", e),
        };

        let Some(stored) = stored else {
            let dummy = self.verify(credentials.password(), &self.dummy_hash).await;
            if let Err(e) = dummy_outcome(dummy) {
                return self.unknown(username, "password verification", e);
            }
            log::warn!("Login rejected for {}: invalid credentials", username);
            return Ok(LoginOutcome::Rejected(RejectReason::InvalidCredentials));
        };

        match self.verify(credentials.password(), &stored.password_hash).await {
            Ok(true) => {}
            Ok(false) => {
                log::warn!("Login rejected for {}: invalid credentials", username);
                return Ok(LoginOutcome::Rejected(RejectReason::InvalidCredentials));
            }
            Err(e) => return self.unknown(username, "password verification", e),
        }

        if self.hasher.needs_rehash(&stored.password_hash) {
            log::warn!("Stored hash for user {} is not argon2id", stored.user_id);
        }

        let identity = Identity::new(stored.user_id, stored.username);
        match self.sessions.establish(&identity).await {
            Ok(session) => {
                log::info!("User logged in: {} ({})", identity.username, identity.user_id);
                Ok(LoginOutcome::Authenticated(session))
            }
            Err(e) => self.unknown(username, "session establishment", e),
        }
    }

    /// Argon2 verification off the async workers
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, StoreError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || hasher.verify_password(&password, &hash))
            .await
            .map_err(|e| StoreError::Invariant(format!("password verification task failed: {}", e)))?
            .map_err(|e| StoreError::Corrupt(e.to_string()))
    }

    fn unknown(
        &self,
        username: &str,
        stage: &str,
        err: StoreError,
    ) -> Result<LoginOutcome, StoreError> {
        if !err.is_operational() {
            log::error!("Login for {} aborted during {}: {}", username, stage, err);
            return Err(err);
        }

        log::error!("Login failed for {} during {}: {}", username, stage, err);
        Ok(LoginOutcome::Rejected(RejectReason::Unknown))
    }
}

/// Only the elapsed time of a dummy verification matters, unless the
/// verification task itself broke.
fn dummy_outcome(result: Result<bool, StoreError>) -> Result<(), StoreError> {
    match result {
        Err(e) if !e.is_operational() => Err(e),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::store::{MemoryCredentialStore, StoredCredential};
    use crate::error::StoreResult;
    use crate::session::{MemorySessionStore, SessionConfig, SessionStore};

    const USER_ID: &str = "410544b2-4001-4271-9855-fec4b6a6442a";
    const USERNAME: &str = "user@nextmail.com";
    const PASSWORD: &str = "123456";

    fn cheap_hasher() -> PasswordHasherService {
        PasswordHasherService::with_params(256, 1, 1).unwrap()
    }

    fn seeded_store() -> MemoryCredentialStore {
        MemoryCredentialStore::new([StoredCredential {
            user_id: USER_ID.to_string(),
            username: USERNAME.to_string(),
            password_hash: cheap_hasher().hash_password(PASSWORD).unwrap(),
        }])
    }

    fn authenticator(
        credentials: Arc<dyn CredentialStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> CredentialAuthenticator {
        let middleware = Arc::new(SessionMiddleware::new(sessions, SessionConfig::new()));
        CredentialAuthenticator::with_hasher(credentials, middleware, cheap_hasher()).unwrap()
    }

    fn creds(username: &str, password: &str) -> Credentials {
        Credentials::parse(Some(username), Some(password), 6).unwrap()
    }

    struct FailingCredentialStore(StoreError);

    #[async_trait::async_trait]
    impl CredentialStore for FailingCredentialStore {
        async fn find_by_username(&self, _: &str) -> StoreResult<Option<StoredCredential>> {
            Err(self.0.clone())
        }
    }

    struct ReadOnlySessionStore;

    #[async_trait::async_trait]
    impl SessionStore for ReadOnlySessionStore {
        async fn get(&self, _: &str) -> StoreResult<Option<Session>> {
            Ok(None)
        }
        async fn set(&self, _: Session) -> StoreResult<()> {
            Err(StoreError::Unavailable("session backend read-only".to_string()))
        }
        async fn delete(&self, _: &str) -> StoreResult<()> {
            Ok(())
        }
        async fn touch(&self, _: &str) -> StoreResult<Option<Session>> {
            Ok(None)
        }
        async fn cleanup_expired(&self) -> StoreResult<usize> {
            Ok(0)
        }
        async fn count(&self) -> StoreResult<usize> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_correct_password_authenticates() {
        let sessions = Arc::new(MemorySessionStore::new());
        let auth = authenticator(Arc::new(seeded_store()), sessions.clone());

        let outcome = auth.authenticate(&creds(USERNAME, PASSWORD)).await.unwrap();
        let LoginOutcome::Authenticated(session) = outcome else {
            panic!("expected Authenticated, got {:?}", outcome);
        };

        assert_eq!(session.identity(), Some(Identity::new(USER_ID, USERNAME)));
        assert!(sessions.exists(&session.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_wrong_password_rejected_without_session() {
        let sessions = Arc::new(MemorySessionStore::new());
        let auth = authenticator(Arc::new(seeded_store()), sessions.clone());

        let outcome = auth.authenticate(&creds(USERNAME, "wrong-password")).await.unwrap();
        assert!(matches!(outcome, LoginOutcome::Rejected(RejectReason::InvalidCredentials)));
        assert_eq!(sessions.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_user_gets_same_rejection() {
        let sessions = Arc::new(MemorySessionStore::new());
        let auth = authenticator(Arc::new(seeded_store()), sessions.clone());

        let unknown = auth.authenticate(&creds("nobody@nextmail.com", PASSWORD)).await.unwrap();
        let wrong = auth.authenticate(&creds(USERNAME, "wrong-password")).await.unwrap();

        let (LoginOutcome::Rejected(a), LoginOutcome::Rejected(b)) = (unknown, wrong) else {
            panic!("both attempts must be rejected");
        };
        assert_eq!(a, RejectReason::InvalidCredentials);
        assert_eq!(a.user_message(), b.user_message());
        assert_eq!(sessions.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_store_outage_is_unknown() {
        let sessions = Arc::new(MemorySessionStore::new());
        let store = FailingCredentialStore(StoreError::Unavailable("connection refused".into()));
        let auth = authenticator(Arc::new(store), sessions.clone());

        let outcome = auth.authenticate(&creds(USERNAME, PASSWORD)).await.unwrap();
        assert!(matches!(outcome, LoginOutcome::Rejected(RejectReason::Unknown)));
        assert_eq!(RejectReason::Unknown.user_message(), "Something went wrong.");
        assert_eq!(sessions.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_store_timeout_is_unknown() {
        let store = FailingCredentialStore(StoreError::Timeout(2000));
        let auth = authenticator(Arc::new(store), Arc::new(MemorySessionStore::new()));

        let outcome = auth.authenticate(&creds(USERNAME, PASSWORD)).await.unwrap();
        assert!(matches!(outcome, LoginOutcome::Rejected(RejectReason::Unknown)));
    }

    #[tokio::test]
    async fn test_invariant_violation_propagates() {
        let store = FailingCredentialStore(StoreError::Invariant("lock poisoned".into()));
        let auth = authenticator(Arc::new(store), Arc::new(MemorySessionStore::new()));

        let err = auth.authenticate(&creds(USERNAME, PASSWORD)).await.unwrap_err();
        assert_eq!(err, StoreError::Invariant("lock poisoned".into()));
    }

    #[tokio::test]
    async fn test_corrupt_stored_hash_is_unknown() {
        let store = MemoryCredentialStore::new([StoredCredential {
            user_id: USER_ID.to_string(),
            username: USERNAME.to_string(),
            password_hash: "plaintext-123456".to_string(),
        }]);
        let auth = authenticator(Arc::new(store), Arc::new(MemorySessionStore::new()));

        let outcome = auth.authenticate(&creds(USERNAME, PASSWORD)).await.unwrap();
        assert!(matches!(outcome, LoginOutcome::Rejected(RejectReason::Unknown)));
    }

    #[tokio::test]
    async fn test_session_write_failure_is_unknown() {
        let auth = authenticator(Arc::new(seeded_store()), Arc::new(ReadOnlySessionStore));

        let outcome = auth.authenticate(&creds(USERNAME, PASSWORD)).await.unwrap();
        assert!(matches!(outcome, LoginOutcome::Rejected(RejectReason::Unknown)));
    }

    #[test]
    fn test_dummy_verification_failure_kinds() {
        assert!(dummy_outcome(Ok(false)).is_ok());
        assert!(dummy_outcome(Err(StoreError::Corrupt("bad hash".into()))).is_ok());

        let panicked = StoreError::Invariant("password verification task failed".into());
        assert_eq!(dummy_outcome(Err(panicked.clone())), Err(panicked));
    }

    #[test]
    fn test_login_state_messages() {
        assert_eq!(LoginState::Idle.message(), None);
        assert_eq!(
            LoginState::Rejected(RejectReason::InvalidCredentials).message(),
            Some("Invalid credentials.")
        );
        assert_eq!(
            LoginState::Invalid(ValidationError::MissingPassword).message(),
            Some("Please enter a valid username and password.")
        );
    }
}
