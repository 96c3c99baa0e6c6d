//! Top-level configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::{
    BackendKind, DataConfig, EmbeddingConfig, EngineConfig, GenerationDefaults, ModelConfig,
    OpenAIBackendConfig,
};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Could not read the config file
    #[error("config IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File contents did not parse
    #[error("config parse error in {path}: {message}")]
    Parse {
        /// File being parsed
        path: String,
        /// Parser message
        message: String,
    },

    /// File extension not recognised or format feature disabled
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// Values parsed but are out of range
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Complete promptforge configuration
///
/// ```toml
/// [model]
/// name = "gpt-4o-mini"
/// backend = "openai"
///
/// [data]
/// examples = "./data/ICL_examples.json"
/// model_mapping = "./data/model_mapping.json"
///
/// [embedding]
/// provider = "openai"
/// endpoint = "http://localhost:8080/v1"
///
/// [local]
/// num_gpus = 2
/// visible_devices = "0,1"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    /// Model selection
    pub model: ModelConfig,
    /// Data file locations
    pub data: DataConfig,
    /// Embedding provider
    pub embedding: EmbeddingConfig,
    /// Hosted API backend settings
    pub openai: OpenAIBackendConfig,
    /// Self-hosted engine settings
    pub local: EngineConfig,
    /// Per-call defaults
    pub generation: GenerationDefaults,
}

impl ForgeConfig {
    /// Check values that serde cannot
    pub fn validate(&self) -> ConfigResult<()> {
        if self.model.name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "model.name must be set".to_string(),
            ));
        }
        if self.embedding.model.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "embedding.model must not be empty".to_string(),
            ));
        }
        if self.generation.optimized_icl && self.generation.num_optimized_icl == 0 {
            return Err(ConfigError::Invalid(
                "generation.num_optimized_icl must be > 0 when optimized_icl is enabled"
                    .to_string(),
            ));
        }

        match self.model.backend {
            BackendKind::OpenAI => {
                if self.openai.api_key_env.trim().is_empty() {
                    return Err(ConfigError::Invalid(
                        "openai.api_key_env must name an environment variable".to_string(),
                    ));
                }
            }
            BackendKind::Local => {
                let engine = &self.local;
                if engine.num_gpus == 0 {
                    return Err(ConfigError::Invalid(
                        "local.num_gpus must be > 0".to_string(),
                    ));
                }
                if !(engine.gpu_memory_utilization > 0.0 && engine.gpu_memory_utilization <= 1.0)
                {
                    return Err(ConfigError::Invalid(format!(
                        "local.gpu_memory_utilization must be in (0, 1], got {}",
                        engine.gpu_memory_utilization
                    )));
                }
                if engine.max_model_len == Some(0) {
                    return Err(ConfigError::Invalid(
                        "local.max_model_len must be > 0 when set".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}
