//! Embedding providers
//!
//! Both providers talk HTTP to an embedding service. The mock provider from
//! `promptforge-core` is available through configuration for dry runs.

pub mod ollama;
pub mod openai;

pub use ollama::OllamaEmbeddings;
pub use openai::OpenAIEmbeddings;

use std::sync::Arc;
use std::time::Duration;

use promptforge_config::{EmbeddingConfig, EmbeddingProviderType};
use promptforge_core::test_support::MockEmbeddingProvider;
use promptforge_core::{EmbeddingError, EmbeddingProvider, EmbeddingResult};

/// Create an embedding provider from configuration
pub fn create_provider(config: &EmbeddingConfig) -> EmbeddingResult<Arc<dyn EmbeddingProvider>> {
    match config.provider {
        EmbeddingProviderType::OpenAI => Ok(Arc::new(OpenAIEmbeddings::new(config)?)),
        EmbeddingProviderType::Ollama => Ok(Arc::new(OllamaEmbeddings::new(config)?)),
        EmbeddingProviderType::Mock => Ok(Arc::new(match config.dimensions {
            Some(dimensions) => MockEmbeddingProvider::with_dimensions(dimensions),
            None => MockEmbeddingProvider::default(),
        })),
    }
}

/// Read the API key named by `api_key_env`, if one is configured
fn resolve_api_key(config: &EmbeddingConfig) -> EmbeddingResult<Option<String>> {
    match &config.api_key_env {
        None => Ok(None),
        Some(var) => std::env::var(var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(Some)
            .ok_or_else(|| EmbeddingError::ConfigError(format!("{} not set", var))),
    }
}

fn build_client(timeout_secs: u64) -> EmbeddingResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| EmbeddingError::ConfigError(format!("Failed to build HTTP client: {}", e)))
}

/// Reject vectors that disagree with the configured dimension
fn check_dimensions(expected: Option<usize>, vector: Vec<f32>) -> EmbeddingResult<Vec<f32>> {
    match expected {
        Some(expected) if expected != vector.len() => Err(EmbeddingError::DimensionMismatch {
            expected,
            actual: vector.len(),
        }),
        _ if vector.is_empty() => Err(EmbeddingError::InvalidResponse(
            "Empty embedding vector".to_string(),
        )),
        _ => Ok(vector),
    }
}
