//! Retrieval-augmented question answering for Coursemate.
//!
//! The flow for one question:
//! 1. [`RagSystem::query`] wraps the question in the course prompt and reads
//!    session history
//! 2. [`AiGenerator`] asks the model, offering the registered tools
//! 3. If the model requests tools, a [`ToolRun`] executes them once and the
//!    results go back to the model for the final answer
//! 4. The sources the tools reported are returned with the answer

pub mod generator;
pub mod session;
pub mod system;
pub mod tools;

#[cfg(test)]
mod test_support;

pub use generator::AiGenerator;
pub use session::{SessionManager, SessionMessage};
pub use system::{CourseAnalytics, RagSystem};
pub use tools::{
    CourseOutlineTool, CourseSearchTool, Source, Tool, ToolError, ToolManager, ToolOutput,
    ToolResult, ToolRun,
};
