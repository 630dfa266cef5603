//! Server error types.

use std::io;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use lanotifica_protocol::{ErrorCode, ErrorResponse, ProtocolError};

use crate::backend::BackendError;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// IO error (listener, file, etc.).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Malformed or incomplete request.
    #[error("{0}")]
    Validation(#[from] ProtocolError),

    /// The notification backend failed to show or close a notification.
    #[error("notification backend unavailable: {0}")]
    BackendUnavailable(#[from] BackendError),

    /// Address string does not name a port.
    #[error("invalid port spec '{spec}': {reason}")]
    InvalidPortSpec { spec: String, reason: String },

    /// Service discovery failed.
    #[error("discovery error: {message}")]
    Discovery { message: String },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl ServerError {
    /// Creates an invalid port spec error.
    pub fn invalid_port_spec(spec: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPortSpec {
            spec: spec.into(),
            reason: reason.into(),
        }
    }

    /// Creates a discovery error.
    pub fn discovery(message: impl Into<String>) -> Self {
        Self::Discovery {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// HTTP status reported to clients.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error code reported to clients.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::InvalidRequest,
            Self::BackendUnavailable(_) => ErrorCode::BackendUnavailable,
            _ => ErrorCode::InternalError,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        // Validation messages are safe to echo; internals are not.
        let message = match &self {
            Self::Validation(err) => err.to_string(),
            _ => code.description().to_string(),
        };
        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_is_bad_request() {
        let err = ServerError::from(ProtocolError::missing_field("message"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), ErrorCode::InvalidRequest);
        assert_eq!(err.to_string(), "message is required");
    }

    #[test]
    fn backend_is_internal_error() {
        let err = ServerError::from(BackendError::Unsupported);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), ErrorCode::BackendUnavailable);
    }

    #[test]
    fn port_spec_message() {
        let err = ServerError::invalid_port_spec(":", "missing port number");
        assert_eq!(err.to_string(), "invalid port spec ':': missing port number");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
