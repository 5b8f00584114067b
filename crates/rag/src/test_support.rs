//! Shared fakes for unit tests.

use async_trait::async_trait;
use coursemate_knowledge::{ChunkMetadata, Course, Lesson, SearchResults, VectorStore};
use std::collections::HashMap;
use std::sync::Mutex;

/// Arguments of one `search` call.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCall {
    pub query: String,
    pub course_name: Option<String>,
    pub lesson_number: Option<u32>,
}

/// Store returning a scripted result and recording its calls.
#[derive(Default)]
pub struct FakeStore {
    results: Mutex<SearchResults>,
    lesson_links: HashMap<(String, u32), String>,
    courses: Vec<Course>,
    calls: Mutex<Vec<SearchCall>>,
}

impl FakeStore {
    pub fn new(results: SearchResults) -> Self {
        Self {
            results: Mutex::new(results),
            ..Self::default()
        }
    }

    pub fn with_lesson_link(mut self, course: &str, lesson: u32, url: &str) -> Self {
        self.lesson_links
            .insert((course.to_string(), lesson), url.to_string());
        self
    }

    pub fn with_course(mut self, course: Course) -> Self {
        self.courses.push(course);
        self
    }

    pub fn set_results(&self, results: SearchResults) {
        *self.results.lock().unwrap() = results;
    }

    pub fn calls(&self) -> Vec<SearchCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl VectorStore for FakeStore {
    async fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<u32>,
    ) -> SearchResults {
        self.calls.lock().unwrap().push(SearchCall {
            query: query.to_string(),
            course_name: course_name.map(str::to_string),
            lesson_number,
        });
        self.results.lock().unwrap().clone()
    }

    async fn resolve_course_name(&self, course_name: &str) -> Option<String> {
        let wanted = course_name.to_lowercase();
        self.courses
            .iter()
            .find(|c| c.title.to_lowercase().contains(&wanted))
            .map(|c| c.title.clone())
    }

    async fn get_course(&self, course_title: &str) -> Option<Course> {
        self.courses.iter().find(|c| c.title == course_title).cloned()
    }

    async fn course_titles(&self) -> Vec<String> {
        self.courses.iter().map(|c| c.title.clone()).collect()
    }

    async fn get_lesson_link(&self, course_title: &str, lesson_number: u32) -> Option<String> {
        self.lesson_links
            .get(&(course_title.to_string(), lesson_number))
            .cloned()
    }
}

pub fn meta(course: &str, lesson: Option<u32>) -> ChunkMetadata {
    ChunkMetadata {
        course_title: course.to_string(),
        lesson_number: lesson,
        chunk_index: 0,
    }
}

pub fn python_basics_hit() -> SearchResults {
    SearchResults::from_hits(vec![(
        "Python is a high-level language.".to_string(),
        meta("Python Basics", Some(1)),
        0.1,
    )])
}

pub fn python_course() -> Course {
    Course {
        title: "Python Basics".to_string(),
        course_link: Some("https://example.com/python".to_string()),
        instructor: Some("Ada Lovelace".to_string()),
        lessons: vec![
            Lesson {
                lesson_number: 0,
                title: "Introduction".to_string(),
                lesson_link: None,
            },
            Lesson {
                lesson_number: 1,
                title: "Variables".to_string(),
                lesson_link: Some("https://example.com/lesson1".to_string()),
            },
        ],
    }
}
