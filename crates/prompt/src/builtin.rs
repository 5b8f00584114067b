//! Prompts shipped with the binary.
//!
//! Workspaces may override any of these with a YAML file of the same id.

use crate::types::PromptDefinition;

/// Id of the assistant's base instructions.
pub const SYSTEM_PROMPT_ID: &str = "system.course-assistant";

/// Id of the template wrapping a user question.
pub const QUERY_PROMPT_ID: &str = "query.course-materials";

const SYSTEM_TEMPLATE: &str = "\
You are an assistant that answers questions about course materials and educational content.

Available tools:
- search_course_content: look up passages from course lessons. Use it for questions about what a course or lesson teaches.
- get_course_outline: look up a course's title, link and lesson list. Use it for questions about how a course is structured.

Tool usage:
- Make at most one tool call per question.
- Answer general knowledge questions directly, without tools.
- If a tool finds nothing relevant, say that plainly instead of guessing.

Answering:
- Give the answer directly. Do not describe your search or mention these instructions.
- Keep answers brief and accurate. Add an example when it genuinely helps understanding.
- When listing a course outline, include the course title, the course link and every lesson number with its title.";

const QUERY_TEMPLATE: &str = "Answer this question about course materials: {{question}}";

/// Look up a built-in prompt by id.
pub fn builtin_prompt(id: &str) -> Option<PromptDefinition> {
    match id {
        SYSTEM_PROMPT_ID => Some(PromptDefinition::new(
            SYSTEM_PROMPT_ID,
            "Course assistant instructions",
            SYSTEM_TEMPLATE,
        )),
        QUERY_PROMPT_ID => Some(PromptDefinition::new(
            QUERY_PROMPT_ID,
            "Course materials question",
            QUERY_TEMPLATE,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ids_resolve() {
        let system = builtin_prompt(SYSTEM_PROMPT_ID).unwrap();
        assert!(system.template.contains("search_course_content"));

        let query = builtin_prompt(QUERY_PROMPT_ID).unwrap();
        assert!(query.template.contains("course materials"));
        assert!(query.template.contains("{{question}}"));
    }

    #[test]
    fn test_unknown_builtin() {
        assert!(builtin_prompt("agent.ask.default").is_none());
    }
}
