//! Message types for the LLM Messages API.
//!
//! These mirror the Anthropic wire format closely enough to be serialized
//! directly, while giving the tool-calling loop a typed view of what the
//! model returned.

use serde::{Deserialize, Serialize};

/// Author of a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single content block inside a message.
///
/// The model answers with `Text` and `ToolUse` blocks; the caller replies to
/// tool requests with `ToolResult` blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text
    Text { text: String },

    /// A request from the model to invoke a tool
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },

    /// The outcome of a tool invocation, correlated by `tool_use_id`
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        is_error: bool,
    },

    /// A block type this client does not model; skipped by the helpers
    #[serde(other)]
    Unknown,
}

impl ContentBlock {
    /// Create a text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create a tool result block answering the tool request `tool_use_id`.
    pub fn tool_result(tool_use_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::ToolResult {
            tool_use_id: tool_use_id.into(),
            content: content.into(),
            is_error: false,
        }
    }
}

/// Message content: either a bare string or a list of blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

/// One turn in the conversation sent to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    /// A user message with plain text content.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// A user message made of content blocks (used for tool results).
    pub fn user_blocks(blocks: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Blocks(blocks),
        }
    }

    /// An assistant message made of content blocks.
    pub fn assistant_blocks(blocks: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Blocks(blocks),
        }
    }

    /// Content blocks of this message (empty for plain text content).
    pub fn blocks(&self) -> &[ContentBlock] {
        match &self.content {
            MessageContent::Text(_) => &[],
            MessageContent::Blocks(blocks) => blocks,
        }
    }
}

/// Static schema describing a tool to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// How the model may pick tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolChoice {
    /// The model decides whether to call a tool
    Auto,
    /// The model must call some tool
    Any,
    /// The model must call the named tool
    Tool { name: String },
}

/// Why the model ended its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    ToolUse,
    MaxTokens,
    StopSequence,
    Refusal,
    PauseTurn,
    /// Any reason added to the API later; treated like a finished turn
    #[serde(other)]
    Other,
}

/// Token usage statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

/// A Messages API request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRequest {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
}

impl MessageRequest {
    /// Create a request with no system prompt and no tools.
    pub fn new(model: impl Into<String>, max_tokens: u32, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            temperature: 0.0,
            system: None,
            messages,
            tools: None,
            tool_choice: None,
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the system prompt.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Offer tools to the model.
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>, choice: ToolChoice) -> Self {
        self.tools = Some(tools);
        self.tool_choice = Some(choice);
        self
    }
}

/// A Messages API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<StopReason>,
    #[serde(default)]
    pub usage: Usage,
}

impl MessageResponse {
    /// A response that answers directly with `text`.
    pub fn text_reply(text: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            model: String::new(),
            content: vec![ContentBlock::text(text)],
            stop_reason: Some(StopReason::EndTurn),
            usage: Usage::default(),
        }
    }

    /// A response that requests one tool call.
    pub fn tool_request(
        id: impl Into<String>,
        name: impl Into<String>,
        input: serde_json::Value,
    ) -> Self {
        Self {
            id: String::new(),
            model: String::new(),
            content: vec![ContentBlock::ToolUse {
                id: id.into(),
                name: name.into(),
                input,
            }],
            stop_reason: Some(StopReason::ToolUse),
            usage: Usage::default(),
        }
    }

    /// Concatenated text of all text blocks.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether the model stopped to request tool execution.
    pub fn wants_tools(&self) -> bool {
        self.stop_reason == Some(StopReason::ToolUse)
    }

    /// Iterate over tool requests as `(id, name, input)`.
    pub fn tool_uses(&self) -> impl Iterator<Item = (&str, &str, &serde_json::Value)> {
        self.content.iter().filter_map(|block| match block {
            ContentBlock::ToolUse { id, name, input } => {
                Some((id.as_str(), name.as_str(), input))
            }
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_omits_absent_tools() {
        let request = MessageRequest::new("claude-test", 800, vec![Message::user("Hi")]);
        let value = serde_json::to_value(&request).unwrap();

        assert!(value.get("tools").is_none());
        assert!(value.get("tool_choice").is_none());
        assert!(value.get("system").is_none());
        assert_eq!(value["messages"][0]["content"], "Hi");
    }

    #[test]
    fn test_request_with_tools_serializes_auto_choice() {
        let tool = ToolDefinition {
            name: "search_course_content".to_string(),
            description: "Search course materials".to_string(),
            input_schema: json!({"type": "object"}),
        };
        let request = MessageRequest::new("claude-test", 800, vec![Message::user("Hi")])
            .with_tools(vec![tool], ToolChoice::Auto);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["tool_choice"], json!({"type": "auto"}));
        assert_eq!(value["tools"][0]["name"], "search_course_content");
    }

    #[test]
    fn test_tool_result_wire_format() {
        let block = ContentBlock::tool_result("toolu_1", "Course content here.");
        let value = serde_json::to_value(&block).unwrap();

        assert_eq!(
            value,
            json!({
                "type": "tool_result",
                "tool_use_id": "toolu_1",
                "content": "Course content here."
            })
        );
    }

    #[test]
    fn test_response_parsing() {
        let raw = json!({
            "id": "msg_1",
            "model": "claude-test",
            "stop_reason": "tool_use",
            "content": [
                {"type": "text", "text": "Let me search."},
                {"type": "tool_use", "id": "toolu_9", "name": "search_course_content",
                 "input": {"query": "API basics"}}
            ],
            "usage": {"input_tokens": 12, "output_tokens": 7}
        });

        let response: MessageResponse = serde_json::from_value(raw).unwrap();
        assert!(response.wants_tools());
        assert_eq!(response.text(), "Let me search.");

        let uses: Vec<_> = response.tool_uses().collect();
        assert_eq!(uses.len(), 1);
        assert_eq!(uses[0].0, "toolu_9");
        assert_eq!(uses[0].1, "search_course_content");
        assert_eq!(uses[0].2["query"], "API basics");
        assert_eq!(response.usage.input_tokens, 12);
    }

    #[test]
    fn test_response_with_refusal_stop_reason() {
        let raw = json!({
            "stop_reason": "refusal",
            "content": [{"type": "text", "text": "I can't help with that."}]
        });

        let response: MessageResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response.stop_reason, Some(StopReason::Refusal));
        assert!(!response.wants_tools());
        assert_eq!(response.text(), "I can't help with that.");
    }

    #[test]
    fn test_unrecognized_stop_reason_and_block_are_tolerated() {
        let raw = json!({
            "stop_reason": "model_context_window_exceeded",
            "content": [
                {"type": "thinking", "thinking": "hmm", "signature": "abc"},
                {"type": "text", "text": "Partial answer."}
            ]
        });

        let response: MessageResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response.stop_reason, Some(StopReason::Other));
        assert_eq!(response.content[0], ContentBlock::Unknown);
        assert_eq!(response.text(), "Partial answer.");
        assert_eq!(response.tool_uses().count(), 0);
    }

    #[test]
    fn test_text_of_tool_only_response_is_empty() {
        let response = MessageResponse::tool_request("t1", "search", json!({}));
        assert_eq!(response.text(), "");
    }
}
