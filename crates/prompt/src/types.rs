//! Prompt types for Coursemate.

use serde::{Deserialize, Serialize};

/// A prompt definition, either built in or loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// Template string with Handlebars syntax
    pub template: String,
}

impl PromptDefinition {
    /// Create a prompt definition.
    pub fn new(id: impl Into<String>, title: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            template: template.into(),
        }
    }
}
