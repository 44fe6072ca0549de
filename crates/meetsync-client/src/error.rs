//! Client error types.

use std::fmt;

use meetsync_core::TracingError;
use meetsync_providers::ProviderError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// A required setting is absent; holds the environment variable name.
    ConfigurationMissing(&'static str),
    /// Configuration could not be read or is invalid.
    Config(String),
    /// Meetup API error.
    Provider(ProviderError),
    /// Tracing could not be initialised.
    Tracing(TracingError),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigurationMissing(var) => {
                write!(f, "missing configuration: {} must be set", var)
            }
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Provider(err) => write!(f, "meetup error: {}", err),
            Self::Tracing(err) => write!(f, "logging error: {}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Provider(err) => Some(err),
            Self::Tracing(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ProviderError> for ClientError {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err)
    }
}

impl From<TracingError> for ClientError {
    fn from(err: TracingError) -> Self {
        Self::Tracing(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_missing_variable() {
        let err = ClientError::ConfigurationMissing("MEETUP_API_KEY");
        assert_eq!(
            err.to_string(),
            "missing configuration: MEETUP_API_KEY must be set"
        );
    }

    #[test]
    fn config_error_has_no_source() {
        use std::error::Error;
        let err = ClientError::Config("failed to parse config.toml".to_string());
        assert!(err.source().is_none());
        assert_eq!(
            err.to_string(),
            "configuration error: failed to parse config.toml"
        );
    }

    #[test]
    fn provider_error_is_source() {
        use std::error::Error;
        let err = ClientError::from(ProviderError::status(500, "boom"));
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("meetup error: fetch_failed"));
    }
}
