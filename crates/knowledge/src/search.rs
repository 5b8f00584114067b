//! Search result container.

use coursemate_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Where a retrieved document came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub course_title: String,
    #[serde(default)]
    pub lesson_number: Option<u32>,
    #[serde(default)]
    pub chunk_index: usize,
}

/// Outcome of a vector store query.
///
/// `documents`, `metadata` and `distances` are parallel: index `i` of each
/// describes the same hit. A store that fails reports it through `error`,
/// in which case all three sequences are empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub documents: Vec<String>,
    pub metadata: Vec<ChunkMetadata>,
    pub distances: Vec<f32>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SearchResults {
    /// Build results from parallel sequences, rejecting mismatched lengths.
    pub fn new(
        documents: Vec<String>,
        metadata: Vec<ChunkMetadata>,
        distances: Vec<f32>,
    ) -> AppResult<Self> {
        if documents.len() != metadata.len() || documents.len() != distances.len() {
            return Err(AppError::Knowledge(format!(
                "Mismatched search results: {} documents, {} metadata, {} distances",
                documents.len(),
                metadata.len(),
                distances.len()
            )));
        }

        Ok(Self {
            documents,
            metadata,
            distances,
            error: None,
        })
    }

    /// Build results from `(document, metadata, distance)` hits.
    pub fn from_hits(hits: impl IntoIterator<Item = (String, ChunkMetadata, f32)>) -> Self {
        let mut results = Self::default();
        for (document, metadata, distance) in hits {
            results.documents.push(document);
            results.metadata.push(metadata);
            results.distances.push(distance);
        }
        results
    }

    /// Results carrying only an error message.
    pub fn empty(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Iterate hits in rank order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChunkMetadata)> {
        self.documents
            .iter()
            .map(String::as_str)
            .zip(self.metadata.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(title: &str, lesson: Option<u32>) -> ChunkMetadata {
        ChunkMetadata {
            course_title: title.to_string(),
            lesson_number: lesson,
            chunk_index: 0,
        }
    }

    #[test]
    fn test_new_rejects_mismatched_lengths() {
        let result = SearchResults::new(
            vec!["a".to_string(), "b".to_string()],
            vec![meta("A", None)],
            vec![0.1, 0.2],
        );
        assert!(matches!(result, Err(AppError::Knowledge(_))));
    }

    #[test]
    fn test_empty_with_error() {
        let results = SearchResults::empty("Search error: index unavailable");
        assert!(results.is_empty());
        assert_eq!(results.len(), 0);
        assert!(results.metadata.is_empty());
        assert_eq!(results.error.as_deref(), Some("Search error: index unavailable"));
    }

    #[test]
    fn test_from_hits_keeps_order() {
        let results = SearchResults::from_hits(vec![
            ("first".to_string(), meta("A", Some(1)), 0.1),
            ("second".to_string(), meta("B", None), 0.4),
        ]);

        assert_eq!(results.len(), 2);
        assert!(results.error.is_none());
        let titles: Vec<&str> = results.iter().map(|(_, m)| m.course_title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert_eq!(results.distances, vec![0.1, 0.4]);
    }
}
