//! Error types for the image server
//!
//! Every per-request failure ends up here and is turned into a status code
//! at the handler boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::imaging::CodecError;

// == Service Error Enum ==
/// Unified per-request error type.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The request path cannot name a file under the root
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No regular file at the resolved path
    #[error("File not found: {0}")]
    NotFound(String),

    /// The file is not a decodable image
    #[error("Decode failed: {0}")]
    Decode(String),

    /// The converted image could not be encoded
    #[error("Encode failed: {0}")]
    Encode(String),

    /// Any other failure while serving the request
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Status code this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Decode(_) | ServiceError::Encode(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<CodecError> for ServiceError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Decode(_) => ServiceError::Decode(err.to_string()),
            CodecError::Encode(_) => ServiceError::Encode(err.to_string()),
        }
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServiceError::Internal(format!("conversion task failed: {err}"))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Only the status is meaningful; the body is a short reason phrase.
        let body = status.canonical_reason().unwrap_or("error");
        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for request handling.
pub type Result<T> = std::result::Result<T, ServiceError>;
