//! Retrieval-augmented worker

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{AgentError, Result};
use crate::graph::{ConversationState, Next, StateUpdate};
use crate::llm::{CompletionRequest, LlmClient, Message};
use crate::memory::BoundedMemory;
use crate::retrieval::{DocumentIndex, SearchProvider};

use super::prompt::build_prompt;
use super::retriever::{DocumentRetriever, Retriever, WebRetriever};
use super::{Worker, WorkerKind};

/// Worker that grounds an LLM answer in retrieved material
pub struct AgentWorker {
    kind: WorkerKind,
    llm: Arc<dyn LlmClient>,
    retriever: Arc<dyn Retriever>,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl AgentWorker {
    pub fn new(kind: WorkerKind, llm: Arc<dyn LlmClient>, retriever: Arc<dyn Retriever>) -> Self {
        Self {
            kind,
            llm,
            retriever,
            temperature: 0.0,
            max_tokens: None,
        }
    }

    /// Worker answering general questions from web search results.
    pub fn web_searcher(
        llm: Arc<dyn LlmClient>,
        provider: Arc<dyn SearchProvider>,
        max_results: usize,
    ) -> Self {
        Self::new(
            WorkerKind::WebSearcher,
            llm,
            Arc::new(WebRetriever::new(provider, max_results)),
        )
    }

    /// Worker answering questions about ingested documents.
    pub fn document_analyst(
        llm: Arc<dyn LlmClient>,
        index: Arc<dyn DocumentIndex>,
        top_k: usize,
    ) -> Self {
        Self::new(
            WorkerKind::DocumentAnalyst,
            llm,
            Arc::new(DocumentRetriever::new(index, top_k)),
        )
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Cap answer length. `None` leaves it to the provider.
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Answer `query` against the current memory without touching it.
    async fn answer(&self, query: &str, memory: &BoundedMemory) -> Result<Message> {
        let sources = self.retriever.retrieve(query).await?;
        tracing::debug!(
            worker = %self.kind,
            retriever = self.retriever.name(),
            results = sources.len(),
            "Retrieved grounding material"
        );

        let prompt = build_prompt(
            &memory.snapshot(),
            query,
            self.retriever.payload_label(),
            &sources,
        );
        let mut request = CompletionRequest::prompt(prompt).with_temperature(self.temperature);
        if let Some(tokens) = self.max_tokens {
            request = request.with_max_tokens(tokens);
        }
        let response = self.llm.complete(request).await?;

        let content = response
            .content
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                AgentError::Llm(format!(
                    "{} returned an empty completion for {}",
                    self.llm.provider(),
                    self.kind
                ))
            })?;

        Ok(Message::from_worker(self.kind, content))
    }
}

#[async_trait]
impl Worker for AgentWorker {
    fn kind(&self) -> WorkerKind {
        self.kind
    }

    async fn run(
        &self,
        state: &ConversationState,
        memory: &mut BoundedMemory,
    ) -> Result<StateUpdate> {
        let query = state
            .latest_user_message()
            .cloned()
            .ok_or_else(|| AgentError::InvalidFormat("no user message to answer".to_string()))?;

        let answer = self.answer(&query.content, memory).await?;

        memory.push(query);
        memory.push(answer.clone());

        Ok(StateUpdate::route(Next::Supervisor).with_message(answer))
    }
}
