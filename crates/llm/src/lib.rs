//! LLM integration crate for Coursemate.
//!
//! This crate provides a provider-agnostic abstraction over a
//! tool-calling Messages API.
//!
//! # Providers
//! - **Anthropic**: hosted Claude models
//! - **Mock**: scripted replies for tests and offline runs
//!
//! # Example
//! ```no_run
//! use coursemate_llm::{LlmClient, Message, MessageRequest, providers::AnthropicClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AnthropicClient::new("sk-ant-...");
//! let request = MessageRequest::new("claude-sonnet-4-20250514", 800, vec![Message::user("Hello")]);
//! let response = client.create_message(&request).await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::LlmClient;
pub use error::LlmError;
pub use factory::create_client;
pub use providers::{AnthropicClient, MockLlmClient};
pub use types::{
    ContentBlock, Message, MessageContent, MessageRequest, MessageResponse, Role, StopReason,
    ToolChoice, ToolDefinition, Usage,
};
