//! Tavily Search API

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::error::{AgentError, Result};
use crate::http_client::build_http_client;

use super::{RetrievedSource, SearchProvider};

pub struct TavilySearch {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TavilySearch {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: build_http_client(),
            api_key: api_key.into(),
            base_url: "https://api.tavily.com".to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

#[async_trait]
impl SearchProvider for TavilySearch {
    fn name(&self) -> &str {
        "tavily"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<RetrievedSource>> {
        let body = json!({
            "query": query,
            "max_results": max_results
        });
        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Retrieval(format!(
                "Tavily Search API error ({}): {}",
                status, body
            )));
        }

        let data: TavilyResponse = response.json().await?;
        Ok(data
            .results
            .into_iter()
            .take(max_results)
            .map(|r| RetrievedSource::new(r.title, r.url, r.content))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn maps_results_and_respects_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("Authorization", "Bearer tvly-test"))
            .and(body_json(json!({"query": "capital of France", "max_results": 2})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "query": "capital of France",
                "results": [
                    {"title": "Paris - Wikipedia", "url": "https://en.wikipedia.org/wiki/Paris", "content": "Paris is the capital of France."},
                    {"title": "France", "url": "https://example.com/france", "content": "Capital: Paris"},
                    {"title": "Extra", "url": "https://example.com/extra", "content": "ignored"}
                ]
            })))
            .mount(&server)
            .await;

        let search = TavilySearch::new("tvly-test").with_base_url(server.uri());
        let results = search.search("capital of France", 2).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Paris - Wikipedia");
        assert_eq!(results[0].source, "https://en.wikipedia.org/wiki/Paris");
        assert_eq!(results[1].content, "Capital: Paris");
    }

    #[tokio::test]
    async fn api_errors_propagate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let search = TavilySearch::new("wrong").with_base_url(server.uri());
        let err = search.search("anything", 3).await.unwrap_err();
        match err {
            AgentError::Retrieval(message) => assert!(message.contains("bad key")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
