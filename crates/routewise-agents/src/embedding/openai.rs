use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::provider::{EmbeddingConfig, EmbeddingProvider};
use crate::error::{AgentError, Result};
use crate::http_client::build_http_client;

pub struct OpenAIEmbedding {
    client: Client,
    api_key: String,
    base_url: String,
    config: EmbeddingConfig,
}

impl OpenAIEmbedding {
    pub fn new(api_key: impl Into<String>, model: Option<String>) -> Self {
        let model = model.unwrap_or_else(|| "text-embedding-3-small".to_string());
        let dimension = match model.as_str() {
            "text-embedding-3-large" => 3072,
            _ => 1536,
        };

        Self {
            client: build_http_client(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            config: EmbeddingConfig {
                model,
                dimension,
                batch_size: 100,
                timeout_secs: 30,
            },
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    async fn request_batch(&self, input: &[String]) -> Result<Vec<Vec<f32>>> {
        let request = EmbeddingRequest {
            model: &self.config.model,
            input,
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AgentError::Embedding(format!(
                "OpenAI API error {}: {}",
                status, error_text
            )));
        }

        let data: EmbeddingResponse = response.json().await?;
        if data.data.len() != input.len() {
            return Err(AgentError::Embedding(format!(
                "expected {} embeddings, got {}",
                input.len(),
                data.data.len()
            )));
        }

        let mut sorted = data.data;
        sorted.sort_by_key(|d| d.index);
        Ok(sorted.into_iter().map(|d| d.embedding).collect())
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[async_trait]
impl EmbeddingProvider for OpenAIEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let normalized = self.normalize_text(text);
        let embeddings = self.embed_batch(&[normalized]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Embedding("No embedding returned".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.config.batch_size.max(1)) {
            embeddings.extend(self.request_batch(batch).await?);
        }
        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn embeddings_are_returned_in_input_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"index": 1, "embedding": [0.0, 1.0]},
                    {"index": 0, "embedding": [1.0, 0.0]}
                ]
            })))
            .mount(&server)
            .await;

        let embedder = OpenAIEmbedding::new("sk-test", None).with_base_url(server.uri());
        let vectors = embedder
            .embed_batch(&["first".to_string(), "second".to_string()])
            .await
            .unwrap();
        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert_eq!(embedder.dimension(), 1536);
    }

    #[tokio::test]
    async fn empty_batch_makes_no_request() {
        let embedder = OpenAIEmbedding::new("sk-test", None).with_base_url("http://127.0.0.1:9");
        assert!(embedder.embed_batch(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn api_error_maps_to_embedding_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("down"))
            .mount(&server)
            .await;

        let embedder = OpenAIEmbedding::new("sk-test", Some("text-embedding-3-large".into()))
            .with_base_url(server.uri());
        assert_eq!(embedder.dimension(), 3072);
        assert!(matches!(embedder.embed("hello").await, Err(AgentError::Embedding(_))));
    }
}
