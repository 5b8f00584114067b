//! Anthropic Messages API provider.
//!
//! API reference: https://docs.anthropic.com/en/api/messages

use crate::client::LlmClient;
use crate::error::LlmError;
use crate::types::{MessageRequest, MessageResponse};
use serde::Deserialize;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// API version header value.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Error envelope returned by the API on non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type", default)]
    kind: String,
    message: String,
}

/// Anthropic LLM client.
pub struct AnthropicClient {
    /// Base URL for the API
    base_url: String,

    /// API key sent as `x-api-key`
    api_key: String,

    /// HTTP client
    client: reqwest::Client,
}

impl AnthropicClient {
    /// Create a client against the public API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    /// Create a client against a custom base URL (proxies, gateways).
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }
}

/// Pull the human-readable message out of an error body, falling back to
/// the raw text.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if envelope.error.kind.is_empty() => envelope.error.message,
        Ok(envelope) => format!("{}: {}", envelope.error.kind, envelope.error.message),
        Err(_) if body.trim().is_empty() => "Unknown error".to_string(),
        Err(_) => body.chars().take(200).collect(),
    }
}

#[async_trait::async_trait]
impl LlmClient for AnthropicClient {
    fn provider_name(&self) -> &str {
        "anthropic"
    }

    async fn create_message(&self, request: &MessageRequest) -> Result<MessageResponse, LlmError> {
        tracing::info!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.as_ref().map_or(0, Vec::len),
            "Sending message request to Anthropic"
        );
        tracing::debug!("Request: {:?}", request);

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(request)
            .send()
            .await
            .map_err(|e| LlmError::Network(format!("Failed to reach Anthropic: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body);
            tracing::warn!(status = status.as_u16(), "Anthropic API error: {}", message);
            return Err(LlmError::from_status(status.as_u16(), message));
        }

        let message: MessageResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(format!("Failed to parse Anthropic response: {}", e)))?;

        tracing::info!(
            stop_reason = ?message.stop_reason,
            input_tokens = message.usage.input_tokens,
            output_tokens = message.usage.output_tokens,
            "Received response from Anthropic"
        );

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = AnthropicClient::new("test-key");
        assert_eq!(client.provider_name(), "anthropic");
        assert_eq!(client.messages_url(), "https://api.anthropic.com/v1/messages");
    }

    #[test]
    fn test_custom_base_url_trailing_slash() {
        let client = AnthropicClient::with_base_url("http://localhost:8080/", "k");
        assert_eq!(client.messages_url(), "http://localhost:8080/v1/messages");
    }

    #[test]
    fn test_error_message_from_envelope() {
        let body = r#"{"type":"error","error":{"type":"invalid_request_error","message":"Your credit balance is too low"}}"#;
        assert_eq!(
            error_message(body),
            "invalid_request_error: Your credit balance is too low"
        );
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message(""), "Unknown error");
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        // Port 9 (discard) on localhost is not an HTTP server.
        let client = AnthropicClient::with_base_url("http://127.0.0.1:9", "k");
        let request = crate::types::MessageRequest::new(
            "claude-test",
            16,
            vec![crate::types::Message::user("Hi")],
        );

        let result = client.create_message(&request).await;
        assert!(matches!(result, Err(LlmError::Network(_))));
    }
}
