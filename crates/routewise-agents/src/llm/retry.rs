use std::time::Duration;

use reqwest::{Client, Response};
use serde::Serialize;

use crate::error::{AgentError, Result};

/// Backoff policy used by the HTTP LLM adapters.
#[derive(Debug, Clone)]
pub struct LlmRetryConfig {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
}

impl Default for LlmRetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay_ms: 250,
            max_delay_ms: 4_000,
            backoff_multiplier: 2.0,
        }
    }
}

impl LlmRetryConfig {
    /// No retries at all; every failure surfaces immediately.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn delay_for(&self, attempt: u32, retry_after_secs: Option<u64>) -> Duration {
        if let Some(seconds) = retry_after_secs {
            return Duration::from_secs(seconds).min(Duration::from_millis(self.max_delay_ms));
        }

        let multiplier = self
            .backoff_multiplier
            .powi(attempt.saturating_sub(1) as i32);
        let delay = (self.initial_delay_ms as f64 * multiplier) as u64;
        Duration::from_millis(delay.min(self.max_delay_ms))
    }
}

pub fn parse_retry_after(response: &Response) -> Option<u64> {
    response
        .headers()
        .get("retry-after")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
}

pub async fn response_to_error(response: Response, provider: &str) -> AgentError {
    let status = response.status().as_u16();
    let retry_after = parse_retry_after(&response);
    let body = response.text().await.unwrap_or_default();

    // Keep provider error bodies short; they may echo the request.
    const MAX_ERROR_BODY: usize = 512;
    let message = if body.len() > MAX_ERROR_BODY {
        let mut end = MAX_ERROR_BODY;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated]", &body[..end])
    } else {
        body
    };

    AgentError::LlmHttp {
        provider: provider.to_string(),
        status,
        message,
        retry_after_secs: retry_after,
    }
}

/// POST a JSON body with bearer auth, retrying retryable failures.
///
/// Returns the first successful response; the caller decodes it.
pub async fn post_json_with_retry<B: Serialize + ?Sized>(
    client: &Client,
    url: &str,
    api_key: &str,
    body: &B,
    provider: &str,
    config: &LlmRetryConfig,
) -> Result<Response> {
    let mut last_error = None;

    for attempt in 0..=config.max_retries {
        let error = match client
            .post(url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => return Ok(resp),
            Ok(resp) => response_to_error(resp, provider).await,
            Err(e) => AgentError::Http(e),
        };

        if !error.is_retryable() || attempt == config.max_retries {
            return Err(error);
        }

        let delay = config.delay_for(attempt + 1, error.retry_after());
        tracing::warn!(
            provider,
            attempt = attempt + 1,
            delay_ms = delay.as_millis() as u64,
            error = ?error,
            "Retrying LLM request"
        );
        tokio::time::sleep(delay).await;
        last_error = Some(error);
    }

    Err(last_error
        .unwrap_or_else(|| AgentError::Llm(format!("{} request failed after retries", provider))))
}
