//! Provider-level failures.

use coursemate_core::AppError;
use thiserror::Error;

/// Failure reported by an LLM provider call.
///
/// The first three variants are the categories the generator turns into
/// fixed user-facing answers; the rest propagate as `AppError::Llm`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Malformed or rejected request (HTTP 400), e.g. low credit balance
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Invalid or missing credential (HTTP 401)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Too many requests (HTTP 429)
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Any other non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be decoded
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Scripted client ran out of replies
    #[error("No scripted response left for request #{0}")]
    Exhausted(usize),
}

impl LlmError {
    /// Map an HTTP status and provider message to an error category.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 => Self::BadRequest(message),
            401 => Self::Authentication(message),
            429 => Self::RateLimited(message),
            _ => Self::Api { status, message },
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::Llm(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            LlmError::from_status(400, "credit balance too low"),
            LlmError::BadRequest(_)
        ));
        assert!(matches!(
            LlmError::from_status(401, "invalid x-api-key"),
            LlmError::Authentication(_)
        ));
        assert!(matches!(
            LlmError::from_status(429, "slow down"),
            LlmError::RateLimited(_)
        ));
        assert_eq!(
            LlmError::from_status(529, "overloaded"),
            LlmError::Api {
                status: 529,
                message: "overloaded".to_string()
            }
        );
    }

    #[test]
    fn test_into_app_error() {
        let err: AppError = LlmError::Network("connection refused".to_string()).into();
        assert_eq!(err.to_string(), "LLM error: Network error: connection refused");
    }
}
