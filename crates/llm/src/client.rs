//! LLM client abstraction.
//!
//! This module defines the seam between the tool-calling loop and a
//! concrete provider.

use crate::error::LlmError;
use crate::types::{MessageRequest, MessageResponse};

/// Trait for LLM providers.
///
/// One call per request: the provider receives the full conversation
/// (system prompt, messages, optional tools) and returns the model's turn.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Get the provider name (e.g., "anthropic", "mock").
    fn provider_name(&self) -> &str;

    /// Send one Messages API request.
    ///
    /// # Arguments
    /// * `request` - The request to send
    ///
    /// # Returns
    /// The model's response, or a categorized provider failure
    async fn create_message(&self, request: &MessageRequest) -> Result<MessageResponse, LlmError>;
}
