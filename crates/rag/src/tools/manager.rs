//! Tool registry and per-request execution state.

use super::{Source, Tool, ToolError, ToolResult};
use coursemate_core::ToolErrorPolicy;
use coursemate_llm::ToolDefinition;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// What the model sees in place of a store failure under
/// [`ToolErrorPolicy::Redact`].
pub const REDACTED_TOOL_ERROR: &str =
    "The course search is temporarily unavailable. Tell the user the lookup failed and that they can try again shortly.";

/// Registry of tools keyed by name.
///
/// Populated once at startup and shared read-only afterwards. Anything that
/// varies per question lives in a [`ToolRun`].
#[derive(Default)]
pub struct ToolManager {
    tools: BTreeMap<String, Arc<dyn Tool>>,
    error_policy: ToolErrorPolicy,
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error_policy(error_policy: ToolErrorPolicy) -> Self {
        Self {
            tools: BTreeMap::new(),
            error_policy,
        }
    }

    pub fn error_policy(&self) -> ToolErrorPolicy {
        self.error_policy
    }

    /// Register a tool under its declared name. A later registration with
    /// the same name replaces the earlier one.
    pub fn register_tool(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_some() {
            tracing::debug!("Replaced tool registration: {}", name);
        } else {
            tracing::debug!("Registered tool: {}", name);
        }
    }

    /// Schemas of every registered tool, in name order.
    pub fn get_tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|tool| tool.definition().clone())
            .collect()
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Dispatch to the named tool and return its typed result unchanged.
    pub async fn execute_tool(&self, name: &str, input: &Value) -> ToolResult {
        match self.tools.get(name) {
            Some(tool) => tool.execute(input).await,
            None => Err(ToolError::NotFound(name.to_string())),
        }
    }

    /// Begin a request-scoped run that tracks sources for one question.
    pub fn start_run(&self) -> ToolRun<'_> {
        ToolRun {
            manager: self,
            last_sources: BTreeMap::new(),
        }
    }
}

/// Tool execution state for a single question.
///
/// Each call records the executing tool's sources, replacing whatever that
/// tool reported before in this run. Concurrent questions use separate runs,
/// so they never observe each other's sources.
pub struct ToolRun<'a> {
    manager: &'a ToolManager,
    last_sources: BTreeMap<String, Vec<Source>>,
}

impl<'a> ToolRun<'a> {
    /// Execute a tool and render the outcome as the text the model receives.
    ///
    /// Failures never escape as errors: they are rendered according to the
    /// manager's [`ToolErrorPolicy`].
    pub async fn execute_tool(&mut self, name: &str, input: &Value) -> String {
        match self.manager.execute_tool(name, input).await {
            Ok(output) => {
                tracing::debug!(
                    "Tool '{}' returned {} bytes, {} sources",
                    name,
                    output.content.len(),
                    output.sources.len()
                );
                self.last_sources.insert(name.to_string(), output.sources);
                output.content
            }
            Err(err) => {
                tracing::warn!("Tool '{}' failed: {}", name, err);
                if self.manager.contains(name) {
                    self.last_sources.insert(name.to_string(), Vec::new());
                }
                self.render_error(&err)
            }
        }
    }

    fn render_error(&self, err: &ToolError) -> String {
        match (err, self.manager.error_policy) {
            (ToolError::Store(_), ToolErrorPolicy::Redact) => REDACTED_TOOL_ERROR.to_string(),
            _ => err.to_string(),
        }
    }

    /// Sources from the first tool (in name order) that reported any.
    pub fn get_last_sources(&self) -> Vec<Source> {
        self.last_sources
            .values()
            .find(|sources| !sources.is_empty())
            .cloned()
            .unwrap_or_default()
    }

    pub fn reset_sources(&mut self) {
        self.last_sources.clear();
    }
}
