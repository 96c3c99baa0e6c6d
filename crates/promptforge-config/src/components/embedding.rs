//! Embedding provider settings

use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding service flavour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderType {
    /// Any server exposing an OpenAI-compatible `/embeddings` endpoint
    #[default]
    OpenAI,
    /// Ollama `/api/embed`
    Ollama,
    /// Deterministic in-process vectors, for tests and dry runs
    Mock,
}

/// Embedding provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Provider flavour
    pub provider: EmbeddingProviderType,
    /// Embedding model name
    pub model: String,
    /// Service base URL
    pub endpoint: String,
    /// Environment variable holding an API key, if the service needs one
    pub api_key_env: Option<String>,
    /// Expected vector length, checked when set
    pub dimensions: Option<usize>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderType::OpenAI,
            model: defaults::DEFAULT_EMBEDDING_MODEL.to_string(),
            endpoint: defaults::DEFAULT_EMBEDDING_ENDPOINT.to_string(),
            api_key_env: None,
            dimensions: None,
            timeout_secs: 60,
        }
    }
}

impl EmbeddingConfig {
    /// Mock provider with the given vector length
    pub fn mock(dimensions: Option<usize>) -> Self {
        Self {
            provider: EmbeddingProviderType::Mock,
            model: "mock-embedding".to_string(),
            dimensions,
            ..Default::default()
        }
    }

    /// Ollama provider at `endpoint`
    pub fn ollama(endpoint: Option<String>, model: Option<String>) -> Self {
        Self {
            provider: EmbeddingProviderType::Ollama,
            endpoint: endpoint.unwrap_or_else(|| "http://localhost:11434".to_string()),
            model: model.unwrap_or_else(|| "nomic-embed-text".to_string()),
            ..Default::default()
        }
    }
}
