//! Document indexes: an unconfigured placeholder and an in-memory vector index

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::embedding::{EmbeddingProvider, cosine_similarity};
use crate::error::{AgentError, Result};

use super::{DocumentIndex, RetrievedSource};

/// Placeholder used when no document has been ingested.
///
/// Answers every lookup with a single passage saying document search is not
/// configured, so the analyst can tell the user instead of failing.
#[derive(Debug, Clone, Default)]
pub struct UnconfiguredIndex;

#[async_trait]
impl DocumentIndex for UnconfiguredIndex {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn lookup(&self, query: &str, _top_k: usize) -> Result<Vec<RetrievedSource>> {
        Ok(vec![RetrievedSource::new(
            "Document search",
            "none",
            format!(
                "Document search is not configured yet. Run `routewise ingest <file>` first. \
                 (Received query: '{}')",
                query
            ),
        )])
    }
}

/// One embedded chunk of an ingested document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedChunk {
    /// Stable id: `<source>#<chunk_index>`
    pub id: String,
    pub source: String,
    pub chunk_index: usize,
    pub text: String,
    pub embedding: Vec<f32>,
}

impl IndexedChunk {
    pub fn new(source: &str, chunk_index: usize, text: String, embedding: Vec<f32>) -> Self {
        Self {
            id: format!("{}#{}", source, chunk_index),
            source: source.to_string(),
            chunk_index,
            text,
            embedding,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct IndexSnapshot {
    model: String,
    dimension: usize,
    chunks: Vec<IndexedChunk>,
}

/// Cosine-similarity index held in memory, persisted as JSON.
pub struct InMemoryVectorIndex {
    embedder: Arc<dyn EmbeddingProvider>,
    chunks: RwLock<Vec<IndexedChunk>>,
}

impl InMemoryVectorIndex {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            embedder,
            chunks: RwLock::new(Vec::new()),
        }
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    fn check_dimensions(&self, chunks: &[IndexedChunk]) -> Result<()> {
        let dimension = self.embedder.dimension();
        match chunks.iter().find(|c| c.embedding.len() != dimension) {
            Some(bad) => Err(AgentError::Index(format!(
                "chunk {} has dimension {}, index expects {}",
                bad.id,
                bad.embedding.len(),
                dimension
            ))),
            None => Ok(()),
        }
    }

    /// Insert chunks, replacing any with the same id.
    pub async fn upsert(&self, chunks: Vec<IndexedChunk>) -> Result<usize> {
        self.check_dimensions(&chunks)?;

        let count = chunks.len();
        let mut stored = self.chunks.write().await;
        let mut positions: HashMap<String, usize> = stored
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();
        for chunk in chunks {
            match positions.get(&chunk.id) {
                Some(&i) => stored[i] = chunk,
                None => {
                    positions.insert(chunk.id.clone(), stored.len());
                    stored.push(chunk);
                }
            }
        }
        Ok(count)
    }

    /// Swap every chunk from `source` for `chunks` under one write lock.
    ///
    /// Returns how many chunks were dropped. On error the index is unchanged.
    pub async fn replace_source(&self, source: &str, chunks: Vec<IndexedChunk>) -> Result<usize> {
        self.check_dimensions(&chunks)?;
        if let Some(stray) = chunks.iter().find(|c| c.source != source) {
            return Err(AgentError::Index(format!(
                "chunk {} does not belong to {}",
                stray.id, source
            )));
        }

        let mut stored = self.chunks.write().await;
        let before = stored.len();
        stored.retain(|c| c.source != source);
        let removed = before - stored.len();
        stored.extend(chunks);
        Ok(removed)
    }

    pub async fn len(&self) -> usize {
        self.chunks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.chunks.read().await.is_empty()
    }

    /// Write the index to `path` as JSON.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let snapshot = IndexSnapshot {
            model: self.embedder.model_name().to_string(),
            dimension: self.embedder.dimension(),
            chunks: self.chunks.read().await.clone(),
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, serde_json::to_vec(&snapshot)?).await?;
        Ok(())
    }

    /// Load an index written by [`InMemoryVectorIndex::save`].
    ///
    /// The embedder must produce vectors of the dimension the index was
    /// built with.
    pub async fn load(path: &Path, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let snapshot: IndexSnapshot = serde_json::from_slice(&bytes)?;

        if snapshot.dimension != embedder.dimension() {
            return Err(AgentError::Index(format!(
                "index at {} was built with {} ({} dims), current embedder is {} ({} dims)",
                path.display(),
                snapshot.model,
                snapshot.dimension,
                embedder.model_name(),
                embedder.dimension()
            )));
        }

        Ok(Self {
            embedder,
            chunks: RwLock::new(snapshot.chunks),
        })
    }
}

#[async_trait]
impl DocumentIndex for InMemoryVectorIndex {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn lookup(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedSource>> {
        let query_embedding = self.embedder.embed(query).await?;
        let stored = self.chunks.read().await;
        if stored.is_empty() {
            tracing::warn!("Document lookup against an empty index");
            return Ok(Vec::new());
        }

        let mut scored: Vec<(f32, &IndexedChunk)> = stored
            .iter()
            .map(|c| (cosine_similarity(&query_embedding, &c.embedding), c))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(_, c)| {
                RetrievedSource::new(
                    format!("{} (chunk {})", c.source, c.chunk_index + 1),
                    c.id.clone(),
                    c.text.clone(),
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashEmbedding;

    async fn indexed(texts: &[&str]) -> InMemoryVectorIndex {
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(HashEmbedding::new(1024));
        let index = InMemoryVectorIndex::new(embedder.clone());
        let mut chunks = Vec::new();
        for (i, text) in texts.iter().enumerate() {
            let embedding = embedder.embed(text).await.unwrap();
            chunks.push(IndexedChunk::new("report.txt", i, text.to_string(), embedding));
        }
        index.upsert(chunks).await.unwrap();
        index
    }

    #[tokio::test]
    async fn unconfigured_index_echoes_query() {
        let results = UnconfiguredIndex.lookup("page 3", 4).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].content.contains("not configured"));
        assert!(results[0].content.contains("page 3"));
    }

    #[tokio::test]
    async fn lookup_ranks_by_similarity() {
        let index = indexed(&[
            "quarterly revenue grew twelve percent",
            "the office cafeteria menu changes weekly",
            "revenue forecast for next quarter",
        ])
        .await;

        let results = index.lookup("quarter revenue growth", 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.content.contains("revenue")));
        assert!(results[0].source.starts_with("report.txt#"));
    }

    #[tokio::test]
    async fn upsert_replaces_existing_ids() {
        let index = indexed(&["first version"]).await;
        let embedding = index.embedder().embed("second version").await.unwrap();
        index
            .upsert(vec![IndexedChunk::new(
                "report.txt",
                0,
                "second version".to_string(),
                embedding,
            )])
            .await
            .unwrap();

        assert_eq!(index.len().await, 1);
        let results = index.lookup("version", 5).await.unwrap();
        assert_eq!(results[0].content, "second version");
    }

    #[tokio::test]
    async fn upsert_rejects_wrong_dimension() {
        let index = InMemoryVectorIndex::new(Arc::new(HashEmbedding::new(8)));
        let err = index
            .upsert(vec![IndexedChunk::new("a.txt", 0, "x".to_string(), vec![1.0; 3])])
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Index(_)));
    }

    #[tokio::test]
    async fn upsert_keeps_last_duplicate_in_batch() {
        let index = InMemoryVectorIndex::new(Arc::new(HashEmbedding::new(8)));
        let chunks = vec![
            IndexedChunk::new("a.txt", 0, "old".to_string(), vec![0.5; 8]),
            IndexedChunk::new("a.txt", 1, "other".to_string(), vec![0.5; 8]),
            IndexedChunk::new("a.txt", 0, "new".to_string(), vec![0.5; 8]),
        ];
        assert_eq!(index.upsert(chunks).await.unwrap(), 3);
        assert_eq!(index.len().await, 2);

        let stored = index.chunks.read().await;
        assert_eq!(stored[0].text, "new");
        assert_eq!(stored[1].text, "other");
    }

    #[tokio::test]
    async fn failed_replace_leaves_source_intact() {
        let index = indexed(&["alpha", "beta"]).await;
        let wrong = vec![IndexedChunk::new("report.txt", 0, "x".to_string(), vec![1.0; 3])];

        let err = index.replace_source("report.txt", wrong).await.unwrap_err();
        assert!(matches!(err, AgentError::Index(_)));
        assert_eq!(index.len().await, 2);

        let stray = vec![IndexedChunk::new("other.txt", 0, "x".to_string(), vec![0.0; 1024])];
        assert!(index.replace_source("report.txt", stray).await.is_err());
        assert_eq!(index.len().await, 2);
    }

    #[tokio::test]
    async fn empty_index_returns_nothing() {
        let index = InMemoryVectorIndex::new(Arc::new(HashEmbedding::new(8)));
        assert!(index.lookup("anything", 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("index.json");

        let index = indexed(&["alpha", "beta"]).await;
        index.save(&path).await.unwrap();

        let loaded = InMemoryVectorIndex::load(&path, Arc::new(HashEmbedding::new(1024)))
            .await
            .unwrap();
        assert_eq!(loaded.len().await, 2);
        let removed = loaded.replace_source("report.txt", vec![]).await;
        assert_eq!(removed.unwrap(), 2);

        let mismatch = InMemoryVectorIndex::load(&path, Arc::new(HashEmbedding::new(16))).await;
        assert!(matches!(mismatch, Err(AgentError::Index(_))));
    }
}
