use anyhow::{Context, Result};
use colored::Colorize;
use routewise_agents::{InMemoryVectorIndex, TextSplitter, ingest_file};
use serde_json::json;

use crate::cli::{IngestArgs, OutputFormat};
use crate::config::RoutewiseConfig;
use crate::output::print_json;
use crate::setup::build_embedder;

pub async fn run(config: &RoutewiseConfig, args: IngestArgs, format: OutputFormat) -> Result<()> {
    let index_path = match args.index {
        Some(path) => path,
        None => config.index_path()?,
    };
    let embedder = build_embedder(config)?;

    let index = if index_path.exists() {
        InMemoryVectorIndex::load(&index_path, embedder.clone())
            .await
            .with_context(|| format!("Failed to load document index {}", index_path.display()))?
    } else {
        InMemoryVectorIndex::new(embedder.clone())
    };

    let splitter = TextSplitter::new(args.chunk_size, args.overlap);
    let stored = ingest_file(&args.file, &splitter, &index)
        .await
        .with_context(|| format!("Failed to ingest {}", args.file.display()))?;
    index
        .save(&index_path)
        .await
        .with_context(|| format!("Failed to write document index {}", index_path.display()))?;
    let total = index.len().await;

    if format.is_json() {
        return print_json(&json!({
            "file": args.file,
            "chunks": stored,
            "total_chunks": total,
            "index": index_path,
            "embedding_model": embedder.model_name(),
        }));
    }

    println!(
        "{} Ingested {} chunk(s) from {} into {} ({} total)",
        "✓".green().bold(),
        stored,
        args.file.display(),
        index_path.display(),
        total
    );
    Ok(())
}
