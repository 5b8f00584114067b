//! Error types for Coursemate.
//!
//! This module defines a unified error enum that covers every failure
//! category that can escape the core: configuration, I/O, LLM, knowledge
//! store, prompt, and session errors.

use thiserror::Error;

/// Unified error type for Coursemate.
///
/// Recoverable conditions (provider rate limits, store-reported search
/// errors, unknown tool names) are turned into strings closer to where they
/// happen. Anything that reaches this type is meant to propagate to the
/// caller.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// LLM provider errors that were not translated into a user-facing answer
    #[error("LLM error: {0}")]
    Llm(String),

    /// Course catalog and vector store errors
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Conversation session errors
    #[error("Session error: {0}")]
    Session(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_category() {
        let err = AppError::Llm("connection reset".to_string());
        assert_eq!(err.to_string(), "LLM error: connection reset");
    }

    #[test]
    fn test_other_displays_message_only() {
        let err = AppError::Other("Unexpected failure".to_string());
        assert_eq!(err.to_string(), "Unexpected failure");
    }

    #[test]
    fn test_json_error_converts_to_serialization() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: AppError = parse.unwrap_err().into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
