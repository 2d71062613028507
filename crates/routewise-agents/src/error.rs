//! Error types for the agents crate

use thiserror::Error;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("{provider} API error ({status}): {message}")]
    LlmHttp {
        provider: String,
        status: u16,
        message: String,
        retry_after_secs: Option<u64>,
    },

    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("Document index error: {0}")]
    Index(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Max steps reached: {0}")]
    MaxSteps(usize),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("HTTP error")]
    Http(#[from] reqwest::Error),

    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    #[error("IO error")]
    Io(#[from] std::io::Error),
}

impl AgentError {
    /// Whether an adapter may retry the failed request.
    ///
    /// Rate limits, server errors and transport failures qualify. The
    /// orchestration loop itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            AgentError::LlmHttp { status, .. } => *status == 429 || *status >= 500,
            AgentError::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Server-provided `retry-after` hint in seconds, if any.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            AgentError::LlmHttp {
                retry_after_secs, ..
            } => *retry_after_secs,
            _ => None,
        }
    }
}

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn http_error(status: u16) -> AgentError {
        AgentError::LlmHttp {
            provider: "openai".to_string(),
            status,
            message: "boom".to_string(),
            retry_after_secs: Some(2),
        }
    }

    #[test]
    fn rate_limit_and_server_errors_are_retryable() {
        assert!(http_error(429).is_retryable());
        assert!(http_error(503).is_retryable());
        assert!(!http_error(401).is_retryable());
        assert!(!AgentError::Llm("bad".to_string()).is_retryable());
    }

    #[test]
    fn retry_after_only_for_http_errors() {
        assert_eq!(http_error(429).retry_after(), Some(2));
        assert_eq!(AgentError::MaxSteps(3).retry_after(), None);
    }

    #[test]
    fn http_error_display_names_provider() {
        assert_eq!(http_error(401).to_string(), "openai API error (401): boom");
    }

    #[test]
    fn wrapped_errors_leave_detail_to_the_source_chain() {
        use std::error::Error as _;

        let err: AgentError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert_eq!(err.to_string(), "JSON error");
        let source = err.source().map(|s| s.to_string()).unwrap_or_default();
        assert!(source.contains("expected value"));
    }
}
