//! Retrieval collaborators: web search providers and document indexes

mod duckduckgo;
mod index;
mod tavily;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use duckduckgo::DuckDuckGoSearch;
pub use index::{InMemoryVectorIndex, IndexedChunk, UnconfiguredIndex};
pub use tavily::TavilySearch;

/// One retrieved passage and where it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedSource {
    pub title: String,
    /// URL for web results, `file#chunk` locator for document passages
    pub source: String,
    pub content: String,
}

impl RetrievedSource {
    pub fn new(
        title: impl Into<String>,
        source: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            source: source.into(),
            content: content.into(),
        }
    }
}

/// Web search service
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<RetrievedSource>>;
}

/// Lookup over a pre-ingested document index
#[async_trait]
pub trait DocumentIndex: Send + Sync {
    fn name(&self) -> &str;

    async fn lookup(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedSource>>;
}
