//! CLI error types.

use std::fmt;

/// Result type for CLI operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the CLI.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// IO error.
    Io(std::io::Error),
    /// The relay failed to start or stopped with an error.
    Server(lanotifica_server::ServerError),
    /// Logging could not be initialised.
    Tracing(lanotifica_core::TracingError),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Server(err) => write!(f, "server error: {}", err),
            Self::Tracing(err) => write!(f, "logging error: {}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Server(err) => Some(err),
            Self::Tracing(err) => Some(err),
            Self::Config(_) => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<lanotifica_server::ServerError> for ClientError {
    fn from(err: lanotifica_server::ServerError) -> Self {
        Self::Server(err)
    }
}

impl From<lanotifica_core::TracingError> for ClientError {
    fn from(err: lanotifica_core::TracingError) -> Self {
        Self::Tracing(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes() {
        assert_eq!(
            ClientError::Config("bad listen".into()).to_string(),
            "configuration error: bad listen"
        );
        let err = ClientError::from(lanotifica_server::ServerError::config("oops"));
        assert_eq!(err.to_string(), "server error: Configuration error: oops");
    }
}
