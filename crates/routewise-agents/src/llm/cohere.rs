//! Cohere v2 chat provider

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};
use crate::http_client::build_http_client;
use crate::llm::client::{
    CompletionRequest, CompletionResponse, FinishReason, LlmClient, TokenUsage,
};
use crate::llm::retry::{LlmRetryConfig, post_json_with_retry};

pub const DEFAULT_COHERE_MODEL: &str = "c4ai-aya-23-8b";

/// Cohere client
pub struct CohereClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    retry_config: LlmRetryConfig,
}

impl CohereClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: build_http_client(),
            api_key: api_key.into(),
            model: DEFAULT_COHERE_MODEL.to_string(),
            base_url: "https://api.cohere.com/v2".to_string(),
            retry_config: LlmRetryConfig::default(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry_config(mut self, config: LlmRetryConfig) -> Self {
        self.retry_config = config;
        self
    }
}

#[derive(Serialize)]
struct CohereRequest<'a> {
    model: &'a str,
    messages: Vec<CohereMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct CohereMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CohereResponse {
    message: CohereResponseMessage,
    finish_reason: Option<String>,
    usage: Option<CohereUsage>,
}

#[derive(Deserialize)]
struct CohereResponseMessage {
    #[serde(default)]
    content: Vec<CohereContent>,
}

#[derive(Deserialize)]
struct CohereContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct CohereUsage {
    tokens: Option<CohereTokens>,
}

#[derive(Deserialize)]
struct CohereTokens {
    #[serde(default)]
    input_tokens: f64,
    #[serde(default)]
    output_tokens: f64,
}

#[async_trait]
impl LlmClient for CohereClient {
    fn provider(&self) -> &str {
        "cohere"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let body = CohereRequest {
            model: &self.model,
            messages: request
                .messages
                .iter()
                .map(|m| CohereMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = post_json_with_retry(
            &self.client,
            &format!("{}/chat", self.base_url),
            &self.api_key,
            &body,
            "Cohere",
            &self.retry_config,
        )
        .await?;

        let data: CohereResponse = response.json().await?;
        let text: String = data
            .message
            .content
            .iter()
            .filter(|c| c.kind == "text")
            .map(|c| c.text.as_str())
            .collect();

        if text.is_empty() && data.message.content.is_empty() {
            return Err(AgentError::Llm("No response from Cohere".to_string()));
        }

        let finish_reason = match data.finish_reason.as_deref() {
            Some("COMPLETE") | Some("STOP_SEQUENCE") | None => FinishReason::Stop,
            Some("MAX_TOKENS") => FinishReason::MaxTokens,
            _ => FinishReason::Error,
        };

        let usage = data.usage.and_then(|u| u.tokens).map(|t| {
            let prompt_tokens = t.input_tokens as u32;
            let completion_tokens = t.output_tokens as u32;
            TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            }
        });

        Ok(CompletionResponse {
            content: Some(text),
            finish_reason,
            usage,
        })
    }
}
