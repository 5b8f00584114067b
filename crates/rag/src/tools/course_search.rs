//! Semantic search over course content.

use super::{optional_str, optional_u32, required_str, Source, Tool, ToolError, ToolOutput, ToolResult};
use async_trait::async_trait;
use coursemate_knowledge::{ChunkMetadata, SearchResults, VectorStore};
use coursemate_llm::ToolDefinition;
use serde_json::{json, Value};
use std::sync::Arc;

pub const SEARCH_TOOL_NAME: &str = "search_course_content";

/// Searches course passages, optionally filtered by course and lesson.
pub struct CourseSearchTool {
    store: Arc<dyn VectorStore>,
    definition: ToolDefinition,
}

impl CourseSearchTool {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        let definition = ToolDefinition {
            name: SEARCH_TOOL_NAME.to_string(),
            description: "Search course materials with smart course name matching and lesson filtering"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "What to search for in the course content"
                    },
                    "course_name": {
                        "type": "string",
                        "description": "Course title (partial matches work, e.g. 'MCP', 'Introduction')"
                    },
                    "lesson_number": {
                        "type": "integer",
                        "description": "Specific lesson number to search within (e.g. 1, 2, 3)"
                    }
                },
                "required": ["query"]
            }),
        };

        Self { store, definition }
    }

    /// Run one search and format the hits for the model.
    ///
    /// Filters are passed to the store unchanged. A store-reported error
    /// becomes [`ToolError::Store`] carrying the message verbatim.
    pub async fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<u32>,
    ) -> ToolResult {
        let results = self.store.search(query, course_name, lesson_number).await;

        if let Some(error) = results.error {
            tracing::warn!("Course search failed: {}", error);
            return Err(ToolError::Store(error));
        }

        if results.is_empty() {
            return Ok(ToolOutput::text(no_results_message(course_name, lesson_number)));
        }

        Ok(self.format_results(&results).await)
    }

    async fn format_results(&self, results: &SearchResults) -> ToolOutput {
        let mut entries = Vec::with_capacity(results.len());
        let mut sources = Vec::with_capacity(results.len());

        for (document, metadata) in results.iter() {
            let label = source_label(metadata);
            let url = match metadata.lesson_number {
                Some(lesson) => {
                    self.store
                        .get_lesson_link(&metadata.course_title, lesson)
                        .await
                }
                None => None,
            };

            entries.push(format!("[{}]\n{}", label, document));
            sources.push(Source::new(label, url));
        }

        tracing::debug!("Formatted {} search hits", entries.len());

        ToolOutput::with_sources(entries.join("\n\n"), sources)
    }
}

fn source_label(metadata: &ChunkMetadata) -> String {
    match metadata.lesson_number {
        Some(lesson) => format!("{} - Lesson {}", metadata.course_title, lesson),
        None => metadata.course_title.clone(),
    }
}

fn no_results_message(course_name: Option<&str>, lesson_number: Option<u32>) -> String {
    let mut message = String::from("No relevant content found");
    if let Some(course) = course_name {
        message.push_str(&format!(" in course '{}'", course));
    }
    if let Some(lesson) = lesson_number {
        message.push_str(&format!(" in lesson {}", lesson));
    }
    message.push('.');
    message
}

#[async_trait]
impl Tool for CourseSearchTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: &Value) -> ToolResult {
        let query = required_str(SEARCH_TOOL_NAME, input, "query")?;
        let course_name = optional_str(SEARCH_TOOL_NAME, input, "course_name")?;
        let lesson_number = optional_u32(SEARCH_TOOL_NAME, input, "lesson_number")?;

        tracing::info!(
            "Searching course content: query='{}', course={:?}, lesson={:?}",
            query,
            course_name,
            lesson_number
        );

        self.search(query, course_name, lesson_number).await
    }
}
