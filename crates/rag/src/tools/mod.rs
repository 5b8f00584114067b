//! Tools the model can call while answering.
//!
//! A tool returns a typed [`ToolResult`]; turning a failure into text the
//! model sees is left to [`ToolRun`] and the configured error policy.

pub mod course_outline;
pub mod course_search;
pub mod manager;

pub use course_outline::{CourseOutlineTool, OUTLINE_TOOL_NAME};
pub use course_search::{CourseSearchTool, SEARCH_TOOL_NAME};
pub use manager::{ToolManager, ToolRun, REDACTED_TOOL_ERROR};

use async_trait::async_trait;
use coursemate_llm::ToolDefinition;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A retrieved passage that contributed to an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// "Course" or "Course - Lesson N"
    pub label: String,
    pub url: Option<String>,
}

impl Source {
    pub fn new(label: impl Into<String>, url: Option<String>) -> Self {
        Self {
            label: label.into(),
            url,
        }
    }
}

/// Successful tool execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolOutput {
    /// Text handed back to the model
    pub content: String,
    /// Passages this call drew from, in presentation order
    pub sources: Vec<Source>,
}

impl ToolOutput {
    /// Output with no sources.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sources: Vec::new(),
        }
    }

    pub fn with_sources(content: impl Into<String>, sources: Vec<Source>) -> Self {
        Self {
            content: content.into(),
            sources,
        }
    }
}

/// Why a tool call produced no output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    #[error("Tool '{0}' not found")]
    NotFound(String),

    #[error("Invalid input for tool '{tool}': {message}")]
    InvalidInput { tool: String, message: String },

    /// Failure reported by the backing store, kept verbatim
    #[error("{0}")]
    Store(String),
}

pub type ToolResult = Result<ToolOutput, ToolError>;

/// A capability the model may invoke by name.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Schema advertised to the model.
    fn definition(&self) -> &ToolDefinition;

    fn name(&self) -> &str {
        &self.definition().name
    }

    /// Run the tool with the model-supplied JSON input.
    async fn execute(&self, input: &Value) -> ToolResult;
}

fn invalid_input(tool: &str, message: impl Into<String>) -> ToolError {
    ToolError::InvalidInput {
        tool: tool.to_string(),
        message: message.into(),
    }
}

/// Required string argument.
pub(crate) fn required_str<'a>(tool: &str, input: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    match input.get(key) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(invalid_input(tool, format!("'{}' must be a string", key))),
        None => Err(invalid_input(tool, format!("missing required field '{}'", key))),
    }
}

/// Optional string argument; `null` counts as absent.
pub(crate) fn optional_str<'a>(
    tool: &str,
    input: &'a Value,
    key: &str,
) -> Result<Option<&'a str>, ToolError> {
    match input.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(invalid_input(tool, format!("'{}' must be a string", key))),
    }
}

/// Optional non-negative integer argument. Numeric strings such as `"2"`
/// are accepted since models occasionally quote numbers.
pub(crate) fn optional_u32(tool: &str, input: &Value, key: &str) -> Result<Option<u32>, ToolError> {
    let invalid = || invalid_input(tool, format!("'{}' must be a non-negative integer", key));
    match input.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(invalid),
        Some(Value::String(s)) => s.trim().parse::<u32>().map(Some).map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_source_serializes_null_url() {
        let value = serde_json::to_value(Source::new("Python Basics", None)).unwrap();
        assert_eq!(value, json!({"label": "Python Basics", "url": null}));
    }

    #[test]
    fn test_tool_error_display() {
        assert_eq!(
            ToolError::NotFound("nope".to_string()).to_string(),
            "Tool 'nope' not found"
        );
        assert_eq!(
            ToolError::Store("Search error: index offline".to_string()).to_string(),
            "Search error: index offline"
        );
    }

    #[test]
    fn test_input_helpers() {
        let input = json!({"query": "loops", "course_name": null, "lesson_number": "3"});

        assert_eq!(required_str("t", &input, "query").unwrap(), "loops");
        assert_eq!(optional_str("t", &input, "course_name").unwrap(), None);
        assert_eq!(optional_u32("t", &input, "lesson_number").unwrap(), Some(3));
        assert!(required_str("t", &input, "missing").is_err());
    }

    #[test]
    fn test_input_helpers_reject_wrong_types() {
        let input = json!({"query": 5, "course_name": true, "lesson_number": -1});

        assert!(matches!(
            required_str("t", &input, "query"),
            Err(ToolError::InvalidInput { .. })
        ));
        assert!(optional_str("t", &input, "course_name").is_err());
        assert!(optional_u32("t", &input, "lesson_number").is_err());
    }
}
