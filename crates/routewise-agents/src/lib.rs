//! Routewise Agents - supervisor-routed multi-agent chat
//!
//! This crate provides:
//! - Routing classifier (supervisor) with keyword-based delegation
//! - Worker agents for web search and document lookup
//! - Orchestration loop over an accumulating conversation state
//! - Bounded conversation memory with FIFO eviction
//! - LLM, search, embedding and document-index adapters
//! - Offline document ingestion (chunk, embed, upsert)

pub mod agent;
pub mod embedding;
pub mod error;
pub mod graph;
mod http_client;
pub mod ingest;
pub mod llm;
pub mod memory;
pub mod retrieval;
pub mod supervisor;

// Re-export commonly used types
pub use agent::{AgentWorker, DocumentRetriever, Retriever, WebRetriever, Worker, WorkerKind};
pub use embedding::{EmbeddingProvider, HashEmbedding, OpenAIEmbedding};
pub use error::{AgentError, Result};
pub use graph::{
    ConversationState, Next, Orchestrator, OrchestratorConfig, RunOutcome, StateUpdate, StepEvent,
};
pub use ingest::{TextSplitter, ingest_file};
pub use llm::{
    CohereClient, CompletionRequest, CompletionResponse, LlmClient, Message, MockLlmClient,
    OpenAIClient, Role,
};
pub use memory::{BoundedMemory, ConversationId, DEFAULT_MEMORY_CAPACITY, MemoryRegistry};
pub use retrieval::{
    DocumentIndex, DuckDuckGoSearch, InMemoryVectorIndex, RetrievedSource, SearchProvider,
    TavilySearch, UnconfiguredIndex,
};
pub use supervisor::{RoutingConfig, RoutingDecision, Supervisor};
