//! Course knowledge for Coursemate.
//!
//! Provides the catalog model, the [`VectorStore`] seam the search tools
//! query, and an in-memory store backed by offline trigram embeddings.

pub mod embeddings;
pub mod memory_store;
pub mod search;
pub mod types;
pub mod vector_store;

// Re-export commonly used types
pub use embeddings::{create_provider, EmbeddingProvider, TrigramProvider};
pub use memory_store::InMemoryVectorStore;
pub use search::{ChunkMetadata, SearchResults};
pub use types::{Catalog, Course, CourseChunk, Lesson};
pub use vector_store::VectorStore;
