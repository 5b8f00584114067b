//! Character trigram embeddings.

use crate::embeddings::provider::EmbeddingProvider;
use coursemate_core::AppResult;
use std::collections::HashMap;

const STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "as", "are", "was", "were", "for", "to", "of",
    "in", "and", "or", "but", "with", "by", "from", "this", "that", "be", "have", "has", "had",
    "it", "its", "their", "they", "them", "what", "how", "about",
];

/// Deterministic, offline embedding provider.
///
/// Hashes character trigrams and whole words of each significant term into a
/// fixed number of buckets, then normalizes to a unit vector. Texts sharing
/// vocabulary land close together, which is enough for course search without
/// a hosted embedding model.
#[derive(Debug)]
pub struct TrigramProvider {
    dimensions: usize,
}

impl TrigramProvider {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0; self.dimensions];

        for (term, freq) in term_frequencies(text) {
            let chars: Vec<char> = term.chars().collect();
            for window in chars.windows(3) {
                let bucket = hash_bucket(window.iter().collect::<String>().as_bytes(), 37, self.dimensions);
                embedding[bucket] += (freq as f32).sqrt();
            }

            let bucket = hash_bucket(term.as_bytes(), 31, self.dimensions);
            embedding[bucket] += freq as f32;
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        embedding
    }
}

/// Lowercased terms longer than two characters, minus stop words and
/// surrounding punctuation, with their counts.
fn term_frequencies(text: &str) -> HashMap<String, u32> {
    let mut freq = HashMap::new();
    for word in text.to_lowercase().split_whitespace() {
        let term = word.trim_matches(|c: char| !c.is_alphanumeric());
        if term.chars().count() > 2 && !STOP_WORDS.contains(&term) {
            *freq.entry(term.to_string()).or_insert(0) += 1;
        }
    }
    freq
}

fn hash_bucket(bytes: &[u8], multiplier: u64, dimensions: usize) -> usize {
    let hash = bytes
        .iter()
        .fold(0u64, |acc, b| acc.wrapping_mul(multiplier).wrapping_add(*b as u64));
    (hash % dimensions as u64) as usize
}

#[async_trait::async_trait]
impl EmbeddingProvider for TrigramProvider {
    fn provider_name(&self) -> &str {
        "trigram"
    }

    fn model_name(&self) -> &str {
        "trigram-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}
