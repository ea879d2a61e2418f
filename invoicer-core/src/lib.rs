//! Invoicer - Core
//!
//! A small invoice dashboard: a session-gated protected area, a credential
//! login flow, and form-driven invoice actions, served over hyper.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use invoicer_core::app::InvoicerApp;
//! use invoicer_core::config::InvoicerConfig;
//! use invoicer_core::http::HttpServer;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = InvoicerConfig::load()?;
//!     let addr = config.server.bind_address();
//!     let app = Arc::new(InvoicerApp::builder(config).build()?);
//!     HttpServer::new(app).serve(&addr).await
//! }
//! ```
//!
//! # Architecture
//!
//! - [`auth`] - route gate, credential validation and authentication
//! - [`session`] - session storage, cookies and request-side extraction
//! - [`invoice`] - invoice forms, storage and actions
//! - [`app`] - request pipeline and routing
//! - [`http`] - hyper server and response helpers
//! - [`config`] - layered TOML/env configuration
//! - [`logging`] - `env_logger` setup and access logging
//! - [`security`] - Argon2id password hashing

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod invoice;
pub mod logging;
pub mod security;
pub mod session;

pub use error::{StoreError, StoreResult};
