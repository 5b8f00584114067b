//! Prompt rendering.

use crate::builtin::{QUERY_PROMPT_ID, SYSTEM_PROMPT_ID};
use crate::loader::load_prompt;
use crate::types::PromptDefinition;
use coursemate_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;
use std::path::Path;

/// Render a prompt definition with the given variables.
///
/// # Example
/// ```
/// use coursemate_prompt::{render, PromptDefinition};
/// use std::collections::HashMap;
///
/// let def = PromptDefinition::new("greet", "Greeting", "Hello, {{name}}!");
/// let mut vars = HashMap::new();
/// vars.insert("name".to_string(), "Ada".to_string());
/// assert_eq!(render(&def, &vars).unwrap(), "Hello, Ada!");
/// ```
pub fn render(definition: &PromptDefinition, variables: &HashMap<String, String>) -> AppResult<String> {
    tracing::trace!("Rendering prompt: {}", definition.id);
    render_template(&definition.template, variables)
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Prompts are plain text, not HTML
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}

/// Append prior conversation to the base system prompt.
///
/// The "Previous conversation:" block is only added when history is present.
pub fn build_system_prompt(base: &str, history: Option<&str>) -> String {
    match history {
        Some(history) => format!("{}\n\nPrevious conversation:\n{}", base, history),
        None => base.to_string(),
    }
}

/// The two prompts a question needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct PromptSet {
    system: String,
    query: PromptDefinition,
}

impl PromptSet {
    /// Resolve both prompts for a workspace (overrides first, then built-ins).
    pub fn load(workspace: &Path) -> AppResult<Self> {
        let system = load_prompt(workspace, SYSTEM_PROMPT_ID)?;
        let query = load_prompt(workspace, QUERY_PROMPT_ID)?;
        Self::from_definitions(&system, query)
    }

    /// The built-in prompts, ignoring any workspace overrides.
    pub fn builtin() -> AppResult<Self> {
        let system = crate::builtin::builtin_prompt(SYSTEM_PROMPT_ID)
            .ok_or_else(|| AppError::Prompt(format!("Missing built-in prompt {}", SYSTEM_PROMPT_ID)))?;
        let query = crate::builtin::builtin_prompt(QUERY_PROMPT_ID)
            .ok_or_else(|| AppError::Prompt(format!("Missing built-in prompt {}", QUERY_PROMPT_ID)))?;
        Self::from_definitions(&system, query)
    }

    fn from_definitions(system: &PromptDefinition, query: PromptDefinition) -> AppResult<Self> {
        let system = render(system, &HashMap::new())?;
        Ok(Self { system, query })
    }

    /// Base instructions for the assistant.
    pub fn system(&self) -> &str {
        &self.system
    }

    /// Wrap a raw user question in the course-materials template.
    pub fn course_query(&self, question: &str) -> AppResult<String> {
        let mut variables = HashMap::new();
        variables.insert("question".to_string(), question.to_string());
        render(&self.query, &variables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_simple_template() {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "What is <RAG>?".to_string());

        let result = render_template("Q: {{question}}", &vars).unwrap();
        // No HTML escaping
        assert_eq!(result, "Q: What is <RAG>?");
    }

    #[test]
    fn test_render_template_missing_variable() {
        let vars = HashMap::new();
        let result = render_template("Question: {{missing}}", &vars);
        assert_eq!(result.unwrap(), "Question: ");
    }

    #[test]
    fn test_render_invalid_template() {
        let vars = HashMap::new();
        let result = render_template("{{#if}}", &vars);
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }

    #[test]
    fn test_system_prompt_without_history() {
        assert_eq!(build_system_prompt("Base.", None), "Base.");
    }

    #[test]
    fn test_system_prompt_with_history() {
        let prompt = build_system_prompt("Base.", Some("User: Hello\nAssistant: Hi"));
        assert_eq!(
            prompt,
            "Base.\n\nPrevious conversation:\nUser: Hello\nAssistant: Hi"
        );
    }

    #[test]
    fn test_builtin_course_query() {
        let prompts = PromptSet::builtin().unwrap();
        let query = prompts.course_query("What is machine learning?").unwrap();

        assert!(query.contains("What is machine learning?"));
        assert!(query.to_lowercase().contains("course materials"));
        assert!(prompts.system().contains("get_course_outline"));
    }

    #[test]
    fn test_load_uses_override() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join(".coursemate/prompts");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("query.course-materials.yml"),
            "id: query.course-materials\ntitle: Short\ntemplate: \"Course question: {{question}}\"\n",
        )
        .unwrap();

        let prompts = PromptSet::load(temp_dir.path()).unwrap();
        assert_eq!(
            prompts.course_query("why?").unwrap(),
            "Course question: why?"
        );
    }
}
