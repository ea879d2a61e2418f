//! Error types shared by the stores and the login flow

use thiserror::Error;

/// Failure reported by a backing store (credentials, sessions, invoices)
///
/// The first three variants are operational: the login flow turns them into a
/// generic user message. `Invariant` signals a bug in a collaborator and is
/// always propagated.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store did not answer in time
    #[error("store operation timed out after {0}ms")]
    Timeout(u64),

    /// A record exists but cannot be interpreted
    #[error("corrupt record: {0}")]
    Corrupt(String),

    /// A collaborator broke its own contract
    #[error("store invariant violated: {0}")]
    Invariant(String),
}

impl StoreError {
    /// Whether the failure belongs to the recoverable `Unknown` category
    pub fn is_operational(&self) -> bool {
        !matches!(self, StoreError::Invariant(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
