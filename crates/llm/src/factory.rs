//! LLM provider factory.
//!
//! Creates an LLM client from the configured provider name, injecting the
//! endpoint override and API key.

use crate::client::LlmClient;
use crate::providers::{AnthropicClient, MockLlmClient};
use std::sync::Arc;

/// Reply used by the `mock` provider when it is selected from config.
const MOCK_ANSWER: &str = "This is an offline answer from the mock provider.";

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("anthropic", "claude", "mock")
/// * `endpoint` - Optional custom base URL
/// * `api_key` - API key (required by hosted providers)
///
/// # Errors
/// Returns error if the provider is unknown or a required key is missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> Result<Arc<dyn LlmClient>, String> {
    match provider.to_lowercase().as_str() {
        "anthropic" | "claude" => {
            let api_key = api_key.ok_or_else(|| "Anthropic provider requires API key".to_string())?;
            let client = match endpoint {
                Some(base_url) => AnthropicClient::with_base_url(base_url, api_key),
                None => AnthropicClient::new(api_key),
            };
            Ok(Arc::new(client))
        }
        "mock" => Ok(Arc::new(MockLlmClient::with_fallback_text(MOCK_ANSWER))),
        _ => Err(format!("Unknown provider: {}", provider)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_anthropic_client() {
        let client = create_client("anthropic", None, Some("test-key")).unwrap();
        assert_eq!(client.provider_name(), "anthropic");
    }

    #[test]
    fn test_claude_alias_with_custom_endpoint() {
        let client = create_client("Claude", Some("http://localhost:8080"), Some("k"));
        assert!(client.is_ok());
    }

    #[test]
    fn test_anthropic_requires_api_key() {
        match create_client("anthropic", None, None) {
            Err(err) => assert!(err.contains("requires API key")),
            Ok(_) => panic!("Expected error for Anthropic without API key"),
        }
    }

    #[test]
    fn test_mock_provider() {
        let client = create_client("mock", None, None).unwrap();
        assert_eq!(client.provider_name(), "mock");
    }

    #[test]
    fn test_unknown_provider() {
        match create_client("ollama", None, None) {
            Err(err) => assert!(err.contains("Unknown provider")),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }
}
