use async_trait::async_trait;

use crate::error::Result;

/// Settings shared by model-backed embedders
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub model: String,
    pub dimension: usize,
    /// Texts sent per request
    pub batch_size: usize,
    pub timeout_secs: u64,
}

/// Turns chunk and query text into fixed-length vectors.
///
/// A document index must be queried with the same provider (or at least the
/// same dimension) it was built with.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Vectors come back in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn dimension(&self) -> usize;

    fn model_name(&self) -> &str;

    /// Collapse whitespace runs and drop control characters.
    fn normalize_text(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for word in text.split_whitespace() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.extend(word.chars().filter(|c| !c.is_control()));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashEmbedding;

    #[test]
    fn normalize_collapses_whitespace_and_controls() {
        let embedder = HashEmbedding::new(8);
        assert_eq!(
            embedder.normalize_text("  page\t3 \n\n of the\u{7}  report "),
            "page 3 of the report"
        );
        assert_eq!(embedder.normalize_text(" \n "), "");
    }
}
