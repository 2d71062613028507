//! CLI setup module
//!
//! Builds the orchestrator and its collaborators from the loaded config.

use anyhow::{Context, Result};
use routewise_agents::{
    AgentWorker, CohereClient, DocumentIndex, DuckDuckGoSearch, EmbeddingProvider, HashEmbedding,
    InMemoryVectorIndex, LlmClient, OpenAIClient, OpenAIEmbedding, Orchestrator, SearchProvider,
    Supervisor, TavilySearch, UnconfiguredIndex,
};
use std::sync::Arc;

use crate::config::{EmbeddingBackend, LlmProvider, RoutewiseConfig, SearchBackend};

/// Wire both workers and the supervisor.
pub async fn build_orchestrator(config: &RoutewiseConfig) -> Result<Orchestrator> {
    let llm = build_llm(config)?;
    let search = build_search(config)?;
    let index = build_index(config).await?;

    tracing::info!(
        llm = llm.provider(),
        model = llm.model(),
        search = search.name(),
        index = index.name(),
        "Orchestrator ready"
    );

    let web_searcher = AgentWorker::web_searcher(llm.clone(), search, config.search.max_results)
        .with_temperature(config.llm.temperature)
        .with_max_tokens(config.llm.max_tokens);
    let document_analyst = AgentWorker::document_analyst(llm, index, config.documents.top_k)
        .with_temperature(config.llm.temperature)
        .with_max_tokens(config.llm.max_tokens);

    Ok(Orchestrator::new(
        Supervisor::new(config.routing.clone()),
        Arc::new(web_searcher),
        Arc::new(document_analyst),
    ))
}

fn build_llm(config: &RoutewiseConfig) -> Result<Arc<dyn LlmClient>> {
    let llm = &config.llm;
    let client: Arc<dyn LlmClient> = match llm.provider {
        LlmProvider::OpenAI => {
            let key = config
                .api_keys
                .openai
                .clone()
                .context("OpenAI API key not found (set OPENAI_API_KEY)")?;
            let mut client = OpenAIClient::new(key);
            if let Some(model) = &llm.model {
                client = client.with_model(model);
            }
            if let Some(url) = &llm.base_url {
                client = client.with_base_url(url);
            }
            Arc::new(client)
        }
        LlmProvider::Cohere => {
            let key = config
                .api_keys
                .cohere
                .clone()
                .context("Cohere API key not found (set COHERE_API_KEY)")?;
            let mut client = CohereClient::new(key);
            if let Some(model) = &llm.model {
                client = client.with_model(model);
            }
            if let Some(url) = &llm.base_url {
                client = client.with_base_url(url);
            }
            Arc::new(client)
        }
    };
    Ok(client)
}

fn build_search(config: &RoutewiseConfig) -> Result<Arc<dyn SearchProvider>> {
    let tavily_key = config.api_keys.tavily.clone();
    let provider: Arc<dyn SearchProvider> = match (config.search.provider, tavily_key) {
        (SearchBackend::Tavily, None) => {
            anyhow::bail!("Tavily API key not found (set TAVILY_API_KEY)")
        }
        (SearchBackend::Tavily | SearchBackend::Auto, Some(key)) => {
            Arc::new(TavilySearch::new(key))
        }
        (SearchBackend::Auto | SearchBackend::DuckDuckGo, _) => Arc::new(DuckDuckGoSearch::new()),
    };
    Ok(provider)
}

pub fn build_embedder(config: &RoutewiseConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    let embedder: Arc<dyn EmbeddingProvider> = match config.documents.embedding {
        EmbeddingBackend::Hash => Arc::new(HashEmbedding::default()),
        EmbeddingBackend::OpenAI => {
            let key = config
                .api_keys
                .openai
                .clone()
                .context("OpenAI API key not found (set OPENAI_API_KEY)")?;
            Arc::new(OpenAIEmbedding::new(key, None))
        }
    };
    Ok(embedder)
}

/// Load the ingested index, or fall back to the unconfigured placeholder.
async fn build_index(config: &RoutewiseConfig) -> Result<Arc<dyn DocumentIndex>> {
    let path = config.index_path()?;
    if !path.exists() {
        tracing::info!(path = %path.display(), "No document index, document search disabled");
        return Ok(Arc::new(UnconfiguredIndex));
    }

    let index = InMemoryVectorIndex::load(&path, build_embedder(config)?)
        .await
        .with_context(|| format!("Failed to load document index {}", path.display()))?;
    tracing::info!(path = %path.display(), chunks = index.len().await, "Loaded document index");
    Ok(Arc::new(index))
}
