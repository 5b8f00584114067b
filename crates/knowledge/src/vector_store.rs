//! Vector store abstraction for course content.

use crate::search::SearchResults;
use crate::types::Course;
use async_trait::async_trait;

/// Trait for course content stores.
///
/// `search` never fails outright: problems such as an unknown course filter
/// are reported through [`SearchResults::error`].
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Find passages similar to `query`, optionally restricted to a course
    /// (matched loosely by name) and a lesson number.
    async fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<u32>,
    ) -> SearchResults;

    /// Resolve a loose course name to the exact stored title.
    async fn resolve_course_name(&self, course_name: &str) -> Option<String>;

    /// Look up a course by its exact title.
    async fn get_course(&self, course_title: &str) -> Option<Course>;

    /// Titles of every known course.
    async fn course_titles(&self) -> Vec<String>;

    async fn course_count(&self) -> usize {
        self.course_titles().await.len()
    }

    async fn get_course_link(&self, course_title: &str) -> Option<String> {
        self.get_course(course_title)
            .await
            .and_then(|course| course.course_link)
    }

    async fn get_lesson_link(&self, course_title: &str, lesson_number: u32) -> Option<String> {
        self.get_course(course_title)
            .await
            .and_then(|course| course.lesson(lesson_number).and_then(|l| l.lesson_link.clone()))
    }
}
