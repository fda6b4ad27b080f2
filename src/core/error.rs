//! Error types for the session broker.

use thiserror::Error;

/// Result type alias for broker operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the hosting backends through the capability traits.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("{0}")]
    Other(String),
}

/// Errors that can occur in broker operations.
#[derive(Error, Debug)]
pub enum Error {
    // Caller errors
    #[error("invalid request for session {session_id}: {reason}")]
    Validation { session_id: String, reason: String },

    // Backend errors
    #[error("{operation} failed for session {session_id}: {source}")]
    Backend {
        session_id: String,
        operation: &'static str,
        #[source]
        source: BackendError,
    },

    #[error("incomplete backend response for session {session_id}: missing {field}")]
    IncompleteResponse {
        session_id: String,
        field: &'static str,
    },

    // Caller context errors
    #[error("request for session {session_id} was cancelled")]
    Cancelled { session_id: String },

    #[error("deadline exceeded for session {session_id}")]
    DeadlineExceeded { session_id: String },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a validation error.
    pub fn validation(session_id: &str, reason: impl Into<String>) -> Self {
        Error::Validation {
            session_id: session_id.to_string(),
            reason: reason.into(),
        }
    }

    /// Session id the error refers to, if it is session-scoped.
    pub fn session_id(&self) -> Option<&str> {
        match self {
            Error::Validation { session_id, .. }
            | Error::Backend { session_id, .. }
            | Error::IncompleteResponse { session_id, .. }
            | Error::Cancelled { session_id }
            | Error::DeadlineExceeded { session_id } => Some(session_id),
            Error::Config(_) => None,
        }
    }

    /// The backend error carried verbatim, if any.
    pub fn backend_error(&self) -> Option<&BackendError> {
        match self {
            Error::Backend { source, .. } => Some(source),
            Error::Validation { .. }
            | Error::IncompleteResponse { .. }
            | Error::Cancelled { .. }
            | Error::DeadlineExceeded { .. }
            | Error::Config(_) => None,
        }
    }

    /// Check if this is a caller validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// Check if the caller cancelled the request or its deadline expired.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Error::Cancelled { .. } | Error::DeadlineExceeded { .. })
    }
}
