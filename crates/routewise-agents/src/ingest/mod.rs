//! Offline document ingestion
//!
//! ```text
//! file ──read──► text ──split──► chunks ──embed──► vectors ──upsert──► index
//! ```
//!
//! Documents are read as UTF-8 text. Re-ingesting a file replaces the chunks
//! previously stored for it.

mod splitter;

use std::path::Path;

use crate::error::{AgentError, Result};
use crate::retrieval::{InMemoryVectorIndex, IndexedChunk};

pub use splitter::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, TextSplitter};

/// Load `path`, split it, embed it with the index's own embedder and swap
/// it into `index`.
///
/// Returns the number of chunks stored. A document with no text stores
/// nothing and returns 0. On error the index keeps its previous chunks.
pub async fn ingest_file(
    path: &Path,
    splitter: &TextSplitter,
    index: &InMemoryVectorIndex,
) -> Result<usize> {
    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
    {
        return Err(AgentError::InvalidFormat(format!(
            "{} is a PDF; extract its text to a .txt or .md file first",
            path.display()
        )));
    }

    let bytes = tokio::fs::read(path).await?;
    let text = String::from_utf8(bytes).map_err(|_| {
        AgentError::InvalidFormat(format!("{} is not valid UTF-8 text", path.display()))
    })?;

    let source = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let chunks = splitter.split(&text);
    if chunks.is_empty() {
        tracing::warn!(source = %source, "Document has no text, nothing ingested");
        return Ok(0);
    }

    let embedder = index.embedder();
    let embeddings = embedder.embed_batch(&chunks).await?;
    if embeddings.len() != chunks.len() {
        return Err(AgentError::Embedding(format!(
            "expected {} embeddings, got {}",
            chunks.len(),
            embeddings.len()
        )));
    }

    let records: Vec<IndexedChunk> = chunks
        .into_iter()
        .zip(embeddings)
        .enumerate()
        .map(|(i, (text, embedding))| IndexedChunk::new(&source, i, text, embedding))
        .collect();

    let stored = records.len();
    let replaced = index.replace_source(&source, records).await?;

    tracing::info!(
        source = %source,
        chunks = stored,
        replaced,
        model = embedder.model_name(),
        "Ingested document"
    );
    Ok(stored)
}
