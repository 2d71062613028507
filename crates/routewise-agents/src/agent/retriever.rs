//! Worker-facing retrieval seam

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::retrieval::{DocumentIndex, RetrievedSource, SearchProvider};

/// Web results requested per query
pub const DEFAULT_MAX_SEARCH_RESULTS: usize = 3;
/// Document passages returned per lookup
pub const DEFAULT_TOP_K: usize = 4;

/// Source of grounding material for a worker's prompt
#[async_trait]
pub trait Retriever: Send + Sync {
    fn name(&self) -> &str;

    /// Heading the prompt uses for the retrieved material.
    fn payload_label(&self) -> &str;

    async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedSource>>;
}

/// Retrieves web search results
pub struct WebRetriever {
    provider: Arc<dyn SearchProvider>,
    max_results: usize,
}

impl WebRetriever {
    pub fn new(provider: Arc<dyn SearchProvider>, max_results: usize) -> Self {
        Self {
            provider,
            max_results: max_results.max(1),
        }
    }
}

#[async_trait]
impl Retriever for WebRetriever {
    fn name(&self) -> &str {
        self.provider.name()
    }

    fn payload_label(&self) -> &str {
        "SEARCH RESULTS"
    }

    async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedSource>> {
        self.provider.search(query, self.max_results).await
    }
}

/// Retrieves passages from a document index
pub struct DocumentRetriever {
    index: Arc<dyn DocumentIndex>,
    top_k: usize,
}

impl DocumentRetriever {
    pub fn new(index: Arc<dyn DocumentIndex>, top_k: usize) -> Self {
        Self {
            index,
            top_k: top_k.max(1),
        }
    }
}

#[async_trait]
impl Retriever for DocumentRetriever {
    fn name(&self) -> &str {
        self.index.name()
    }

    fn payload_label(&self) -> &str {
        "DOCUMENT PASSAGES"
    }

    async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedSource>> {
        self.index.lookup(query, self.top_k).await
    }
}
