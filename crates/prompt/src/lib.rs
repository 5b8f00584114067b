//! Prompt system for Coursemate.
//!
//! This crate provides:
//! - Built-in prompts for the course assistant
//! - YAML overrides from `.coursemate/prompts/`
//! - Handlebars template rendering

pub mod builder;
pub mod builtin;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::{build_system_prompt, render, PromptSet};
pub use builtin::{builtin_prompt, QUERY_PROMPT_ID, SYSTEM_PROMPT_ID};
pub use loader::{list_prompts, load_prompt};
pub use types::PromptDefinition;
