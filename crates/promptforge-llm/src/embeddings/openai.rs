//! OpenAI-compatible `/embeddings` provider
//!
//! Works with OpenAI itself and with self-hosted servers that mirror the API
//! (text-embeddings-inference, vLLM, infinity).

use async_trait::async_trait;
use promptforge_config::EmbeddingConfig;
use promptforge_core::{EmbeddingError, EmbeddingProvider, EmbeddingResult};
use serde::Deserialize;
use serde_json::json;
use tracing::trace;

use super::{build_client, check_dimensions, resolve_api_key};

/// Embeddings over an OpenAI-compatible HTTP API
#[derive(Debug)]
pub struct OpenAIEmbeddings {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    dimensions: Option<usize>,
}

impl OpenAIEmbeddings {
    /// Create a provider; fails if a configured key variable is unset
    pub fn new(config: &EmbeddingConfig) -> EmbeddingResult<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(EmbeddingError::ConfigError(
                "Embedding endpoint is empty".to_string(),
            ));
        }

        Ok(Self {
            client: build_client(config.timeout_secs)?,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: resolve_api_key(config)?,
            dimensions: config.dimensions,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddings {
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        let url = format!("{}/embeddings", self.endpoint);
        trace!(model = %self.model, chars = text.len(), "Requesting embedding");

        let mut request = self.client.post(&url).json(&json!({
            "model": self.model,
            "input": text,
        }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EmbeddingError::HttpError(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::HttpError(format!("{}: {}", status, body)));
        }

        let parsed: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;
        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
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
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}
