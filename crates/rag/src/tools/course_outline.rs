//! Course outline lookup.

use super::{required_str, Source, Tool, ToolError, ToolOutput, ToolResult};
use async_trait::async_trait;
use coursemate_knowledge::{Course, VectorStore};
use coursemate_llm::ToolDefinition;
use serde_json::{json, Value};
use std::sync::Arc;

pub const OUTLINE_TOOL_NAME: &str = "get_course_outline";

/// Returns a course's title, link and lesson list.
pub struct CourseOutlineTool {
    store: Arc<dyn VectorStore>,
    definition: ToolDefinition,
}

impl CourseOutlineTool {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        let definition = ToolDefinition {
            name: OUTLINE_TOOL_NAME.to_string(),
            description: "Get a course outline: course title, course link and the numbered list of lessons"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "course_name": {
                        "type": "string",
                        "description": "Course title (partial matches work, e.g. 'MCP', 'Introduction')"
                    }
                },
                "required": ["course_name"]
            }),
        };

        Self { store, definition }
    }

    pub async fn outline(&self, course_name: &str) -> ToolResult {
        let not_found = || ToolError::Store(format!("No course found matching '{}'", course_name));

        let title = self
            .store
            .resolve_course_name(course_name)
            .await
            .ok_or_else(not_found)?;
        let course = self.store.get_course(&title).await.ok_or_else(not_found)?;

        let source = Source::new(course.title.clone(), course.course_link.clone());
        Ok(ToolOutput::with_sources(format_outline(&course), vec![source]))
    }
}

fn format_outline(course: &Course) -> String {
    let mut lines = vec![format!("Course: {}", course.title)];

    if let Some(link) = &course.course_link {
        lines.push(format!("Course link: {}", link));
    }
    if let Some(instructor) = &course.instructor {
        lines.push(format!("Instructor: {}", instructor));
    }

    if course.lessons.is_empty() {
        lines.push("Lessons: none listed".to_string());
    } else {
        lines.push(format!("Lessons ({}):", course.lessons.len()));
        let mut lessons: Vec<_> = course.lessons.iter().collect();
        lessons.sort_by_key(|l| l.lesson_number);
        for lesson in lessons {
            lines.push(format!("Lesson {}: {}", lesson.lesson_number, lesson.title));
        }
    }

    lines.join("\n")
}

#[async_trait]
impl Tool for CourseOutlineTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: &Value) -> ToolResult {
        let course_name = required_str(OUTLINE_TOOL_NAME, input, "course_name")?;
        tracing::info!("Fetching course outline for '{}'", course_name);
        self.outline(course_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{python_course, FakeStore};
    use coursemate_knowledge::SearchResults;

    fn tool() -> CourseOutlineTool {
        let store = FakeStore::new(SearchResults::default()).with_course(python_course());
        CourseOutlineTool::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_outline_lists_lessons() {
        let output = tool()
            .execute(&json!({"course_name": "python"}))
            .await
            .unwrap();

        assert_eq!(
            output.content,
            "Course: Python Basics\n\
             Course link: https://example.com/python\n\
             Instructor: Ada Lovelace\n\
             Lessons (2):\n\
             Lesson 0: Introduction\n\
             Lesson 1: Variables"
        );
        assert_eq!(
            output.sources,
            vec![Source::new(
                "Python Basics",
                Some("https://example.com/python".to_string())
            )]
        );
    }

    #[tokio::test]
    async fn test_unknown_course() {
        let err = tool().outline("Quantum Cooking").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "No course found matching 'Quantum Cooking'"
        );
    }

    #[test]
    fn test_outline_without_lessons() {
        let course = Course {
            title: "Bare".to_string(),
            course_link: None,
            instructor: None,
            lessons: Vec::new(),
        };
        assert_eq!(format_outline(&course), "Course: Bare\nLessons: none listed");
    }
}
