//! In-memory [`VectorStore`] over a catalog snapshot.
//!
//! Chunk and title embeddings are computed once at build time. Search is
//! brute-force cosine similarity over the chunks that pass the filters.

use crate::embeddings::{cosine_similarity, EmbeddingProvider};
use crate::search::{ChunkMetadata, SearchResults};
use crate::types::{Catalog, Course, CourseChunk};
use crate::vector_store::VectorStore;
use async_trait::async_trait;
use coursemate_core::{AppError, AppResult};
use std::cmp::Ordering;
use std::sync::Arc;

/// Minimum title similarity for a loose course name to resolve.
const COURSE_MATCH_THRESHOLD: f32 = 0.20;

struct IndexedChunk {
    chunk: CourseChunk,
    embedding: Vec<f32>,
}

/// Read-only store built from a [`Catalog`].
pub struct InMemoryVectorStore {
    courses: Vec<Course>,
    title_embeddings: Vec<Vec<f32>>,
    chunks: Vec<IndexedChunk>,
    embedder: Arc<dyn EmbeddingProvider>,
    max_results: usize,
}

impl InMemoryVectorStore {
    /// Embed every chunk and course title in the catalog.
    pub async fn build(
        catalog: Catalog,
        embedder: Arc<dyn EmbeddingProvider>,
        max_results: usize,
    ) -> AppResult<Self> {
        let Catalog { courses, chunks } = catalog;

        let titles: Vec<String> = courses.iter().map(|c| c.title.clone()).collect();
        let title_embeddings = embedder.embed_batch(&titles).await?;

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;

        if title_embeddings.len() != titles.len() || embeddings.len() != texts.len() {
            return Err(AppError::Knowledge(format!(
                "Embedding provider '{}' returned the wrong number of vectors",
                embedder.provider_name()
            )));
        }

        let chunks: Vec<IndexedChunk> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexedChunk { chunk, embedding })
            .collect();

        tracing::info!(
            "Built in-memory course index: {} courses, {} chunks ({} model, {} dims)",
            courses.len(),
            chunks.len(),
            embedder.model_name(),
            embedder.dimensions()
        );

        Ok(Self {
            courses,
            title_embeddings,
            chunks,
            embedder,
            max_results,
        })
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    fn find_course(&self, title: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.title == title)
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<u32>,
    ) -> SearchResults {
        let course_title = match course_name {
            Some(name) => match self.resolve_course_name(name).await {
                Some(title) => Some(title),
                None => return SearchResults::empty(format!("No course found matching '{}'", name)),
            },
            None => None,
        };

        let query_embedding = match self.embedder.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                tracing::warn!("Query embedding failed: {}", e);
                return SearchResults::empty(format!("Search error: {}", e));
            }
        };

        let mut scored: Vec<(&IndexedChunk, f32)> = self
            .chunks
            .iter()
            .filter(|entry| {
                course_title
                    .as_deref()
                    .map_or(true, |title| entry.chunk.course_title == title)
            })
            .filter(|entry| lesson_number.map_or(true, |n| entry.chunk.lesson_number == Some(n)))
            .map(|entry| (entry, cosine_similarity(&query_embedding, &entry.embedding)))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(self.max_results);

        tracing::debug!(
            "Search '{}' (course: {:?}, lesson: {:?}) -> {} hits",
            query,
            course_title,
            lesson_number,
            scored.len()
        );

        SearchResults::from_hits(scored.into_iter().map(|(entry, score)| {
            (
                entry.chunk.content.clone(),
                ChunkMetadata {
                    course_title: entry.chunk.course_title.clone(),
                    lesson_number: entry.chunk.lesson_number,
                    chunk_index: entry.chunk.chunk_index,
                },
                1.0 - score,
            )
        }))
    }

    async fn resolve_course_name(&self, course_name: &str) -> Option<String> {
        let wanted = course_name.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }

        if let Some(course) = self.courses.iter().find(|c| c.title.to_lowercase() == wanted) {
            return Some(course.title.clone());
        }

        // Shortest title containing the name, so "Python" prefers "Python Basics"
        // over "Advanced Python Basics".
        if let Some(course) = self
            .courses
            .iter()
            .filter(|c| c.title.to_lowercase().contains(&wanted))
            .min_by_key(|c| c.title.len())
        {
            return Some(course.title.clone());
        }

        let name_embedding = match self.embedder.embed(course_name).await {
            Ok(embedding) => embedding,
            Err(e) => {
                tracing::warn!("Course name embedding failed: {}", e);
                return None;
            }
        };

        self.courses
            .iter()
            .zip(&self.title_embeddings)
            .map(|(course, embedding)| (course, cosine_similarity(&name_embedding, embedding)))
            .filter(|(_, score)| *score >= COURSE_MATCH_THRESHOLD)
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
            .map(|(course, _)| course.title.clone())
    }

    async fn get_course(&self, course_title: &str) -> Option<Course> {
        self.find_course(course_title).cloned()
    }

    async fn course_titles(&self) -> Vec<String> {
        self.courses.iter().map(|c| c.title.clone()).collect()
    }

    async fn course_count(&self) -> usize {
        self.courses.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::TrigramProvider;
    use crate::types::Lesson;

    fn lesson(n: u32, title: &str, link: Option<&str>) -> Lesson {
        Lesson {
            lesson_number: n,
            title: title.to_string(),
            lesson_link: link.map(str::to_string),
        }
    }

    fn chunk(course: &str, lesson: Option<u32>, index: usize, content: &str) -> CourseChunk {
        CourseChunk {
            course_title: course.to_string(),
            lesson_number: lesson,
            chunk_index: index,
            content: content.to_string(),
        }
    }

    fn catalog() -> Catalog {
        Catalog {
            courses: vec![
                Course {
                    title: "Python Basics".to_string(),
                    course_link: Some("https://example.com/python".to_string()),
                    instructor: None,
                    lessons: vec![
                        lesson(1, "Variables", Some("https://example.com/lesson1")),
                        lesson(2, "Functions", None),
                    ],
                },
                Course {
                    title: "Building Vector Databases".to_string(),
                    course_link: None,
                    instructor: Some("Grace".to_string()),
                    lessons: vec![lesson(1, "Embeddings", None)],
                },
            ],
            chunks: vec![
                chunk("Python Basics", Some(1), 0, "Python variables hold values of any type."),
                chunk("Python Basics", Some(2), 1, "Python functions are defined with def keyword."),
                chunk(
                    "Building Vector Databases",
                    Some(1),
                    0,
                    "Embeddings map text into dense vectors for similarity search.",
                ),
            ],
        }
    }

    async fn store(max_results: usize) -> InMemoryVectorStore {
        InMemoryVectorStore::build(catalog(), Arc::new(TrigramProvider::new(384)), max_results)
            .await
            .unwrap()
    }

    #[derive(Debug)]
    struct FailingProvider;

    #[async_trait]
    impl EmbeddingProvider for FailingProvider {
        fn provider_name(&self) -> &str {
            "failing"
        }

        fn model_name(&self) -> &str {
            "failing"
        }

        fn dimensions(&self) -> usize {
            4
        }

        async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
            if texts.iter().any(|t| t.contains("explode")) {
                return Err(AppError::Knowledge("embedding backend offline".to_string()));
            }
            Ok(texts.iter().map(|_| vec![1.0, 0.0, 0.0, 0.0]).collect())
        }
    }

    #[tokio::test]
    async fn test_most_similar_chunk_ranks_first() {
        let store = store(5).await;
        let results = store.search("dense vectors embeddings", None, None).await;

        assert!(results.error.is_none());
        assert_eq!(results.len(), 3);
        assert_eq!(results.metadata[0].course_title, "Building Vector Databases");
        assert!(results.distances[0] <= results.distances[1]);
        assert!(results.distances[1] <= results.distances[2]);
    }

    #[tokio::test]
    async fn test_max_results_caps_hits() {
        let store = store(1).await;
        let results = store.search("python", None, None).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results.documents.len(), results.distances.len());
    }

    #[tokio::test]
    async fn test_course_and_lesson_filters() {
        let store = store(5).await;

        let results = store.search("anything", Some("python basics"), None).await;
        assert_eq!(results.len(), 2);
        assert!(results.metadata.iter().all(|m| m.course_title == "Python Basics"));

        let results = store.search("anything", Some("Python"), Some(2)).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results.metadata[0].lesson_number, Some(2));
        assert!(results.documents[0].contains("def keyword"));
    }

    #[tokio::test]
    async fn test_unknown_course_reports_error() {
        let store = store(5).await;
        let results = store.search("anything", Some("Quantum Cooking"), None).await;

        assert!(results.is_empty());
        assert_eq!(
            results.error.as_deref(),
            Some("No course found matching 'Quantum Cooking'")
        );
    }

    #[tokio::test]
    async fn test_resolve_course_name() {
        let store = store(5).await;

        assert_eq!(
            store.resolve_course_name("PYTHON BASICS").await.as_deref(),
            Some("Python Basics")
        );
        assert_eq!(
            store.resolve_course_name("vector").await.as_deref(),
            Some("Building Vector Databases")
        );
        assert_eq!(
            store.resolve_course_name("vector databases course").await.as_deref(),
            Some("Building Vector Databases")
        );
        assert!(store.resolve_course_name("   ").await.is_none());
    }

    #[tokio::test]
    async fn test_links_and_titles() {
        let store = store(5).await;

        assert_eq!(
            store.get_lesson_link("Python Basics", 1).await.as_deref(),
            Some("https://example.com/lesson1")
        );
        assert!(store.get_lesson_link("Python Basics", 2).await.is_none());
        assert!(store.get_lesson_link("Python Basics", 9).await.is_none());
        assert_eq!(
            store.get_course_link("Python Basics").await.as_deref(),
            Some("https://example.com/python")
        );
        assert_eq!(store.course_count().await, 2);
        assert_eq!(
            store.course_titles().await,
            vec!["Python Basics".to_string(), "Building Vector Databases".to_string()]
        );
    }

    #[tokio::test]
    async fn test_embedding_failure_reports_search_error() {
        let store = InMemoryVectorStore::build(catalog(), Arc::new(FailingProvider), 5)
            .await
            .unwrap();

        let results = store.search("explode please", None, None).await;
        assert!(results.is_empty());
        assert_eq!(
            results.error.as_deref(),
            Some("Search error: Knowledge error: embedding backend offline")
        );
    }

    #[tokio::test]
    async fn test_empty_catalog() {
        let store = InMemoryVectorStore::build(
            Catalog::default(),
            Arc::new(TrigramProvider::new(16)),
            5,
        )
        .await
        .unwrap();

        let results = store.search("anything", None, None).await;
        assert!(results.is_empty());
        assert!(results.error.is_none());
        assert_eq!(store.course_count().await, 0);
    }
}
