//! Protocol error types.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while decoding or validating a request body.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Body is not valid JSON for the expected type.
    #[error("invalid JSON body: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A mandatory field is missing or empty.
    #[error("{field} is required")]
    MissingField { field: &'static str },
}

impl ProtocolError {
    /// Creates a missing field error.
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }
}
