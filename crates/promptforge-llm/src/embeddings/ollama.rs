//! Ollama `/api/embed` provider

use async_trait::async_trait;
use promptforge_config::EmbeddingConfig;
use promptforge_core::{EmbeddingError, EmbeddingProvider, EmbeddingResult};
use serde::Deserialize;
use serde_json::json;

use super::{build_client, check_dimensions};

/// Embeddings from an Ollama server
#[derive(Debug)]
pub struct OllamaEmbeddings {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    dimensions: Option<usize>,
}

impl OllamaEmbeddings {
    /// Create a provider for `config.endpoint`
    pub fn new(config: &EmbeddingConfig) -> EmbeddingResult<Self> {
        Ok(Self {
            client: build_client(config.timeout_secs)?,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            dimensions: config.dimensions,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddings {
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        let response = self
            .client
            .post(format!("{}/api/embed", self.endpoint))
            .json(&json!({ "model": self.model, "input": text }))
            .send()
            .await
            .map_err(|e| EmbeddingError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::HttpError(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let parsed: OllamaEmbedResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;
        let vector = parsed
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::InvalidResponse("No embedding in response".into()))?;

        check_dimensions(self.dimensions, vector)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }
}

#[derive(Debug, Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}
