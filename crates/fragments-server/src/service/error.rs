//! Service layer error types.

use thiserror::Error;

/// Result type for service operations.
pub type Result<T, E = ServiceError> = std::result::Result<T, E>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Failures while building the application state.
///
/// These happen at startup, before any request is served.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Configuration error (invalid values, unknown content types).
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Credentials file could not be read or parsed.
    #[error("Authentication error: {message}")]
    Auth {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// External service error (NATS).
    #[error("External service error ({service}): {message}")]
    ExternalService {
        service: String,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

impl ServiceError {
    /// Creates a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new authentication error with source.
    pub fn auth_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Auth {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new external service error with source.
    pub fn external_service_with_source(
        service: impl Into<String>,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn display_and_source() {
        let error = ServiceError::auth_with_source(
            "failed to read credentials",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert_eq!(
            error.to_string(),
            "Authentication error: failed to read credentials"
        );
        assert!(error.source().is_some());

        let error = ServiceError::config("unknown content type 'x/y'");
        assert!(error.source().is_none());
    }
}
