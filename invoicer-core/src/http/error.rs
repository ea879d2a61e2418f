//! Request handling failures and their responses

use super::response::{self, Resp};
use crate::error::StoreError;
use hyper::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request body exceeds {0} bytes")]
    PayloadTooLarge(usize),

    #[error("failed to read request body: {0}")]
    Body(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type HttpResult<T> = Result<T, HttpError>;

impl HttpError {
    /// Response for the client; store detail is logged, never returned
    pub fn into_response(self, method: &str, path: &str) -> Resp {
        match self {
            HttpError::PayloadTooLarge(limit) => {
                log::warn!("{} {} rejected: body exceeds {} bytes", method, path, limit);
                response::payload_too_large_response(limit)
            }
            HttpError::Body(detail) => {
                log::warn!("{} {} rejected: {}", method, path, detail);
                response::json_error_response(
                    StatusCode::BAD_REQUEST,
                    "bad_request",
                    "Malformed request body",
                )
            }
            HttpError::Store(e) if e.is_operational() => {
                log::error!("{} {} failed: {}", method, path, e);
                response::internal_error_response(StatusCode::SERVICE_UNAVAILABLE)
            }
            HttpError::Store(e) => {
                log::error!("{} {} aborted: {}", method, path, e);
                response::internal_error_response(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}
