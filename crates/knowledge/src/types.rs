//! Course catalog types.

use coursemate_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single lesson within a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub lesson_number: u32,
    pub title: String,
    #[serde(default)]
    pub lesson_link: Option<String>,
}

/// A course and its lesson outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Full course title, also used as the course identifier
    pub title: String,
    #[serde(default)]
    pub course_link: Option<String>,
    #[serde(default)]
    pub instructor: Option<String>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl Course {
    /// Look up a lesson by number.
    pub fn lesson(&self, lesson_number: u32) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.lesson_number == lesson_number)
    }
}

/// A passage of course text that can be retrieved by search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseChunk {
    pub course_title: String,
    #[serde(default)]
    pub lesson_number: Option<u32>,
    pub chunk_index: usize,
    pub content: String,
}

/// Snapshot of every course and chunk the store serves.
///
/// Produced by an external ingestion step and read from JSON at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub chunks: Vec<CourseChunk>,
}

impl Catalog {
    /// Load a catalog snapshot from a JSON file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Knowledge(format!("Failed to read catalog {:?}: {}", path, e))
        })?;

        let catalog: Catalog = serde_json::from_str(&contents).map_err(|e| {
            AppError::Knowledge(format!("Failed to parse catalog {:?}: {}", path, e))
        })?;

        tracing::info!(
            "Loaded catalog {:?}: {} courses, {} chunks",
            path,
            catalog.courses.len(),
            catalog.chunks.len()
        );

        Ok(catalog)
    }

    /// Write the catalog as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
