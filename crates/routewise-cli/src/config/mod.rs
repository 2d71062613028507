//! CLI configuration file support
//!
//! Loads configuration from ~/.config/routewise/config.toml. Missing API keys
//! are filled from the usual environment variables.

use anyhow::{Context, Result};
use routewise_agents::RoutingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::paths;

/// CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutewiseConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    /// API key settings
    #[serde(default)]
    pub api_keys: ApiKeysConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub documents: DocumentsConfig,
    /// Supervisor keyword sets
    #[serde(default)]
    pub routing: RoutingConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    OpenAI,
    Cohere,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    /// Provider default when unset
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub temperature: f32,
    /// Provider default when unset
    pub max_tokens: Option<u32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            model: None,
            base_url: None,
            temperature: 0.0,
            max_tokens: None,
        }
    }
}

/// API key configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeysConfig {
    /// OpenAI API key
    pub openai: Option<String>,
    /// Cohere API key
    pub cohere: Option<String>,
    /// Tavily API key
    pub tavily: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchBackend {
    /// Tavily when a key is available, DuckDuckGo otherwise
    #[default]
    Auto,
    Tavily,
    DuckDuckGo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub provider: SearchBackend,
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: SearchBackend::default(),
            max_results: routewise_agents::agent::DEFAULT_MAX_SEARCH_RESULTS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub capacity: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            capacity: routewise_agents::DEFAULT_MEMORY_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Local feature hashing, no network
    #[default]
    Hash,
    OpenAI,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentsConfig {
    /// Defaults to ~/.routewise/index.json
    pub index_path: Option<PathBuf>,
    pub top_k: usize,
    pub embedding: EmbeddingBackend,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            index_path: None,
            top_k: routewise_agents::agent::DEFAULT_TOP_K,
            embedding: EmbeddingBackend::default(),
        }
    }
}

impl RoutewiseConfig {
    /// Load from `path`, or the default location when `None`.
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path(),
        };

        let mut config = match path {
            Some(path) if path.exists() => Self::load_from_path(&path)?,
            _ => Self::default(),
        };
        config.fill_keys_from_env();
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Get the default configuration file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("routewise").join("config.toml"))
    }

    fn fill_keys_from_env(&mut self) {
        self.fill_keys_with(|name| std::env::var(name).ok());
    }

    fn fill_keys_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let slots = [
            (&mut self.api_keys.openai, "OPENAI_API_KEY"),
            (&mut self.api_keys.cohere, "COHERE_API_KEY"),
            (&mut self.api_keys.tavily, "TAVILY_API_KEY"),
        ];
        for (slot, var) in slots {
            if slot.as_deref().is_none_or(|k| k.trim().is_empty()) {
                *slot = lookup(var).filter(|v| !v.trim().is_empty());
            }
        }
    }

    /// Configured index path, or the default under the data directory.
    pub fn index_path(&self) -> Result<PathBuf> {
        match &self.documents.index_path {
            Some(path) => Ok(path.clone()),
            None => paths::default_index_path(),
        }
    }
}
