//! Login and route gating
//!
//! - [`gate`]: per-request allow / deny / redirect decision
//! - [`credentials`]: login form fields and their shape validation
//! - [`store`]: credential lookup collaborator
//! - [`authenticator`]: password check and session establishment

pub mod authenticator;
pub mod credentials;
pub mod gate;
pub mod store;

pub use authenticator::{CredentialAuthenticator, LoginOutcome, LoginState, RejectReason};
pub use credentials::{Credentials, ValidationError};
pub use gate::{AuthorizationDecision, RouteGate};
pub use store::{CredentialStore, MemoryCredentialStore, StoredCredential};
