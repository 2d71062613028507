//! LLM module - completion service abstraction and providers

mod client;
mod cohere;
mod mock_client;
mod openai;
pub mod retry;

pub use client::{
    CompletionRequest, CompletionResponse, FinishReason, LlmClient, Message, Role, TokenUsage,
};
pub use cohere::{CohereClient, DEFAULT_COHERE_MODEL};
pub use mock_client::{MockLlmClient, MockStep, MockStepKind};
pub use openai::OpenAIClient;
pub use retry::LlmRetryConfig;
