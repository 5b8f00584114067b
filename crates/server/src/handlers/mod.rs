pub mod courses;
pub mod health;
pub mod query;

pub use courses::courses_handler;
pub use health::health_handler;
pub use query::query_handler;
