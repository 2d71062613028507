//! Deterministic mock LLM client for orchestration tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::{Duration, sleep};

use crate::error::{AgentError, Result};

use super::{CompletionRequest, CompletionResponse, FinishReason, LlmClient, Role, TokenUsage};

/// Deterministic step for scripted mock completions.
#[derive(Debug, Clone)]
pub enum MockStepKind {
    /// Return a plain assistant message.
    Text(String),
    /// Return an LLM error.
    Error(String),
    /// Return a timeout-like error after optional delay.
    Timeout,
}

/// Scripted completion step with optional delay.
#[derive(Debug, Clone)]
pub struct MockStep {
    pub delay_ms: u64,
    pub kind: MockStepKind,
}

impl MockStep {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            delay_ms: 0,
            kind: MockStepKind::Text(content.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            delay_ms: 0,
            kind: MockStepKind::Error(message.into()),
        }
    }

    pub fn timeout(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            kind: MockStepKind::Timeout,
        }
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

/// A deterministic mock LLM client driven by scripted steps.
///
/// Every request is recorded so tests can inspect the prompts a worker built.
/// When the script runs dry the client echoes the last user message.
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    model: String,
    script: Arc<Mutex<VecDeque<MockStep>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockLlmClient {
    pub fn new(model: impl Into<String>) -> Self {
        Self::from_steps(model, Vec::new())
    }

    pub fn from_steps(model: impl Into<String>, steps: Vec<MockStep>) -> Self {
        Self {
            model: model.into(),
            script: Arc::new(Mutex::new(VecDeque::from(steps))),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn push_step(&self, step: MockStep) {
        self.script.lock().await.push_back(step);
    }

    /// Requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    async fn next_step(&self) -> Option<MockStep> {
        self.script.lock().await.pop_front()
    }

    fn usage_for(content_len: usize) -> TokenUsage {
        let completion_tokens = content_len as u32;
        TokenUsage {
            prompt_tokens: 1,
            completion_tokens,
            total_tokens: 1 + completion_tokens,
        }
    }

    fn fallback_response(request: &CompletionRequest) -> CompletionResponse {
        let text = request
            .messages
            .iter()
            .rev()
            .find(|msg| msg.role == Role::User)
            .map(|msg| format!("mock-echo: {}", msg.content))
            .unwrap_or_else(|| "mock-ok".to_string());

        CompletionResponse {
            usage: Some(Self::usage_for(text.len())),
            content: Some(text),
            finish_reason: FinishReason::Stop,
        }
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    fn provider(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.requests.lock().await.push(request.clone());

        let Some(step) = self.next_step().await else {
            return Ok(Self::fallback_response(&request));
        };

        if step.delay_ms > 0 {
            sleep(Duration::from_millis(step.delay_ms)).await;
        }

        match step.kind {
            MockStepKind::Text(content) => Ok(CompletionResponse {
                usage: Some(Self::usage_for(content.len())),
                content: Some(content),
                finish_reason: FinishReason::Stop,
            }),
            MockStepKind::Error(message) => Err(AgentError::Llm(message)),
            MockStepKind::Timeout => Err(AgentError::Llm("mock timeout".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Message;

    #[tokio::test]
    async fn mock_client_returns_scripted_text() {
        let client = MockLlmClient::from_steps("mock-model", vec![MockStep::text("hello")]);

        let response = client
            .complete(CompletionRequest::new(vec![Message::user("ping")]))
            .await
            .expect("mock response should succeed");

        assert_eq!(response.content.as_deref(), Some("hello"));
        assert_eq!(response.finish_reason, FinishReason::Stop);
        assert_eq!(client.call_count().await, 1);
    }

    #[tokio::test]
    async fn mock_client_echoes_when_script_is_empty() {
        let client = MockLlmClient::new("mock-model");
        let response = client
            .complete(CompletionRequest::prompt("ping"))
            .await
            .unwrap();
        assert_eq!(response.content.as_deref(), Some("mock-echo: ping"));
    }

    #[tokio::test]
    async fn mock_client_scripted_errors() {
        let client = MockLlmClient::from_steps(
            "mock-model",
            vec![MockStep::error("rate limited"), MockStep::timeout(1)],
        );

        let first = client.complete(CompletionRequest::prompt("a")).await;
        assert!(matches!(first, Err(AgentError::Llm(ref m)) if m == "rate limited"));

        let second = client.complete(CompletionRequest::prompt("b")).await;
        assert!(matches!(second, Err(AgentError::Llm(ref m)) if m == "mock timeout"));

        let prompts: Vec<_> = client
            .requests()
            .await
            .into_iter()
            .map(|r| r.messages[0].content.clone())
            .collect();
        assert_eq!(prompts, vec!["a", "b"]);
    }
}
