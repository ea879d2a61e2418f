//! HTTP plumbing on hyper 1
//!
//! - [`server`] - TCP accept loop, one task per connection
//! - [`request`] - body limits, form decoding, path segments
//! - [`response`] - JSON, HTML and redirect builders
//! - [`pages`] - server-rendered HTML
//! - [`error`] - request failures mapped to responses
//!
//! Routing lives in [`crate::app`].

pub mod error;
pub mod pages;
pub mod request;
pub mod response;
pub mod server;

pub use error::{HttpError, HttpResult};
pub use server::HttpServer;
