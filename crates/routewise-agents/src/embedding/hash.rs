//! Local bag-of-words embedding using feature hashing.
//!
//! Deterministic and offline. Good enough for keyword-level similarity over
//! small documents and for tests; use a model-backed provider for real
//! semantic search.

use async_trait::async_trait;

use super::provider::EmbeddingProvider;
use crate::error::Result;

pub const DEFAULT_HASH_DIMENSION: usize = 384;

#[derive(Debug, Clone)]
pub struct HashEmbedding {
    dimension: usize,
}

impl Default for HashEmbedding {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_DIMENSION)
    }
}

impl HashEmbedding {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let bucket = fnv1a(&token.to_lowercase()) as usize % self.dimension;
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

fn fnv1a(text: &str) -> u64 {
    text.bytes().fold(0xcbf29ce484222325, |hash, byte| {
        (hash ^ byte as u64).wrapping_mul(0x100000001b3)
    })
}

#[async_trait]
impl EmbeddingProvider for HashEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.vectorize(&self.normalize_text(text)))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| self.vectorize(&self.normalize_text(t)))
            .collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "feature-hash"
    }
}
