// src/error.rs
// Error types for the jyotish client

use thiserror::Error;

use crate::intake::ValidationError;

/// Main error type for the jyotish library
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid birth details: {0}")]
    Validation(#[from] ValidationError),

    #[error("backend returned {status}: {detail}")]
    Backend { status: u16, detail: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no active session")]
    NoSession,

    #[error("a chat request is already in flight")]
    SendInFlight,

    #[error("message is empty")]
    EmptyMessage,

    #[error("no suggested question number {0}")]
    NoSuchSuggestion(usize),

    #[error("pending send does not belong to the current conversation")]
    StalePending,

    #[error("a session is already active; reset it before submitting new birth details")]
    SessionActive,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Result using ClientError
pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// True for errors caused by the backend or the network rather than local state
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            ClientError::Backend { .. } | ClientError::Http(_) | ClientError::Json(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = ClientError::Backend {
            status: 404,
            detail: "Session not found".to_string(),
        };
        assert_eq!(err.to_string(), "backend returned 404: Session not found");
        assert!(err.is_backend_failure());
    }

    #[test]
    fn test_local_errors_are_not_backend_failures() {
        assert!(!ClientError::NoSession.is_backend_failure());
        assert!(!ClientError::SendInFlight.is_backend_failure());
        assert!(!ClientError::EmptyMessage.is_backend_failure());
        assert!(!ClientError::StalePending.is_backend_failure());
    }

    #[test]
    fn test_validation_error_converts() {
        let err: ClientError = ValidationError::Missing(vec!["date"]).into();
        assert!(err.to_string().contains("invalid birth details"));
        assert!(err.to_string().contains("date"));
    }

    #[test]
    fn test_json_error_converts() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{nope");
        let err: ClientError = parse.unwrap_err().into();
        assert!(err.to_string().contains("JSON"));
        assert!(err.is_backend_failure());
    }
}
