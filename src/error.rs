//! Error types for the session engine.

use busbar_sf_rest::SaveResult;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for engine operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// A failure reported by the session provider.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Provider(message.into()))
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self.kind, ErrorKind::Unauthenticated)
    }

    pub fn is_provider_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Provider(_))
    }

    /// Returns true if Salesforce rejected the session token.
    ///
    /// Cached sessions are never refreshed; log out and log in again.
    pub fn is_session_expired(&self) -> bool {
        self.source
            .as_deref()
            .and_then(|source| source.downcast_ref::<busbar_sf_rest::Error>())
            .is_some_and(busbar_sf_rest::Error::is_session_expired)
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Unknown login environment or unusable configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Connect, describe, query or save failed in the provider.
    #[error("Provider error: {0}")]
    Provider(String),

    /// A session was needed but no credential has been set.
    #[error("Not authenticated: login has not been called")]
    Unauthenticated,

    /// The provider answered but at least one record was not saved.
    #[error("Saving {object} failed: {message}")]
    SaveFailed {
        object: String,
        message: String,
        results: Vec<SaveResult>,
    },
}

impl From<busbar_sf_auth::Error> for Error {
    fn from(err: busbar_sf_auth::Error) -> Self {
        Error::with_source(ErrorKind::Provider(err.to_string()), err)
    }
}

impl From<busbar_sf_rest::Error> for Error {
    fn from(err: busbar_sf_rest::Error) -> Self {
        Error::with_source(ErrorKind::Provider(err.to_string()), err)
    }
}
