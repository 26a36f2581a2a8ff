//! Error taxonomy
//!
//! Every crate converts its local errors into [`Error`] before they cross a
//! crate boundary. The server maps each variant onto an HTTP status.

use thiserror::Error;

/// Errors surfaced by translation management operations
#[derive(Debug, Error)]
pub enum Error {
    /// A required setting is missing or malformed. Fatal at startup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The database could not be reached. Recoverable; the caller may retry.
    #[error("database connection unavailable: {0}")]
    Connection(String),

    /// Caller input is malformed
    #[error("{0}")]
    Validation(String),

    /// Uniqueness violation on the translation key
    #[error("{0}")]
    Conflict(String),

    /// No translation with the requested id
    #[error("{0}")]
    NotFound(String),

    /// A third-party translation provider failed. Absorbed by the enrichment
    /// pipeline and never returned from an API operation.
    #[error("external service error: {0}")]
    ExternalService(String),

    /// Anything else
    #[error("{0}")]
    Unknown(String),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn external(msg: impl Into<String>) -> Self {
        Self::ExternalService(msg.into())
    }

    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }

    /// Conflict error for an already-taken key
    pub fn duplicate_key() -> Self {
        Self::Conflict("Translation key already exists".to_string())
    }

    /// Not-found error for a translation id
    pub fn translation_not_found() -> Self {
        Self::NotFound("Translation not found".to_string())
    }

    /// Whether the caller is at fault (4xx-class)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::Conflict(_) | Error::NotFound(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(format!("Invalid JSON: {}", err))
    }
}

/// Result alias used across the workspace
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(Error::validation("bad").is_client_error());
        assert!(Error::duplicate_key().is_client_error());
        assert!(Error::translation_not_found().is_client_error());
        assert!(!Error::Connection("down".into()).is_client_error());
        assert!(!Error::unknown("boom").is_client_error());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            Error::duplicate_key().to_string(),
            "Translation key already exists"
        );
        assert_eq!(
            Error::Connection("timed out".into()).to_string(),
            "database connection unavailable: timed out"
        );
    }
}
