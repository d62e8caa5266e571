//! Domain error types

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result of an agent invocation: `Ok` is *completed*, `Err` is *failed*.
pub type AgentResult<T> = Result<T, AgentError>;

/// Message used when the provider stops because the context window is exhausted.
pub const TOO_LONG_MESSAGE: &str = "The conversation was too long for the context window.";

/// Message used when the provider filters the model output.
pub const CONTENT_FILTERED_MESSAGE: &str = "The model's output included restricted content.";

/// Message used when the provider stops for any reason other than a normal stop.
pub const INCOMPLETE_MESSAGE: &str = "The model did not properly complete the request.";

/// Failure taxonomy shared by every agent.
///
/// Each variant carries the originating message. Errors are never downgraded
/// or merged on their way up: the first failure observed is the one the
/// caller receives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Model refused the request: {0}")]
    ModelRefusal(String),

    #[error("{0}")]
    TooLong(String),

    #[error("{0}")]
    ContentFiltered(String),

    #[error("Malformed model output: {0}")]
    MalformedOutput(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Discriminant of [`AgentError`], handy for matching and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Cancelled,
    ModelRefusal,
    TooLong,
    ContentFiltered,
    MalformedOutput,
    TransportError,
    InvalidRequest,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::ModelRefusal => "model_refusal",
            ErrorKind::TooLong => "too_long",
            ErrorKind::ContentFiltered => "content_filtered",
            ErrorKind::MalformedOutput => "malformed_output",
            ErrorKind::TransportError => "transport_error",
            ErrorKind::InvalidRequest => "invalid_request",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AgentError {
    pub fn too_long() -> Self {
        AgentError::TooLong(TOO_LONG_MESSAGE.to_string())
    }

    pub fn content_filtered() -> Self {
        AgentError::ContentFiltered(CONTENT_FILTERED_MESSAGE.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AgentError::Cancelled => ErrorKind::Cancelled,
            AgentError::ModelRefusal(_) => ErrorKind::ModelRefusal,
            AgentError::TooLong(_) => ErrorKind::TooLong,
            AgentError::ContentFiltered(_) => ErrorKind::ContentFiltered,
            AgentError::MalformedOutput(_) => ErrorKind::MalformedOutput,
            AgentError::Transport(_) => ErrorKind::TransportError,
            AgentError::InvalidRequest(_) => ErrorKind::InvalidRequest,
        }
    }

    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AgentError::Cancelled)
    }

    /// Only malformed output is ever worth asking the model for again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AgentError::MalformedOutput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_error_display() {
        let error = AgentError::Cancelled;
        assert_eq!(error.to_string(), "Operation cancelled");
    }

    #[test]
    fn test_is_cancelled_check() {
        assert!(AgentError::Cancelled.is_cancelled());
        assert!(!AgentError::too_long().is_cancelled());
        assert!(!AgentError::Transport("reset".to_string()).is_cancelled());
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(AgentError::too_long().kind(), ErrorKind::TooLong);
        assert_eq!(
            AgentError::content_filtered().kind(),
            ErrorKind::ContentFiltered
        );
        assert_eq!(
            AgentError::Transport("x".into()).kind(),
            ErrorKind::TransportError
        );
        assert_eq!(ErrorKind::MalformedOutput.to_string(), "malformed_output");
    }

    #[test]
    fn test_only_malformed_output_is_retryable() {
        assert!(AgentError::MalformedOutput("bad json".into()).is_retryable());
        assert!(!AgentError::ModelRefusal("no".into()).is_retryable());
        assert!(!AgentError::Cancelled.is_retryable());
    }

    #[test]
    fn test_too_long_message() {
        assert_eq!(AgentError::too_long().to_string(), TOO_LONG_MESSAGE);
    }
}
