//! Command handlers for the Coursemate CLI.

pub mod ask;
pub mod courses;
pub mod serve;

pub use ask::AskCommand;
pub use courses::CoursesCommand;
pub use serve::ServeCommand;
