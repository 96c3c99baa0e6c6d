//! Backend selection and per-backend settings

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults;

/// Which generation backend to construct
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Hosted OpenAI-compatible chat completion API
    #[serde(alias = "hosted")]
    OpenAI,
    /// Self-hosted inference engine
    #[default]
    #[serde(alias = "engine")]
    Local,
}

impl BackendKind {
    /// Parse a backend name, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai" | "hosted" => Some(BackendKind::OpenAI),
            "local" | "engine" => Some(BackendKind::Local),
            _ => None,
        }
    }
}

/// Model selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Backend model identifier; also the key into the prompt registry
    pub name: String,
    /// Backend to run the model on
    pub backend: BackendKind,
}

/// Hosted chat API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAIBackendConfig {
    /// API base URL
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Connect/request timeout in seconds
    pub timeout_secs: u64,
    /// Seed sent with every request for reproducibility
    pub seed: u64,
}

impl Default for OpenAIBackendConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::DEFAULT_OPENAI_BASE_URL.to_string(),
            api_key_env: defaults::DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: defaults::DEFAULT_TIMEOUT_SECS,
            seed: 0,
        }
    }
}

/// Self-hosted engine settings
///
/// `visible_devices` is only ever applied to the engine child process; the
/// current process environment is left alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Base URL of the engine's OpenAI-compatible API
    pub endpoint: String,
    /// Number of GPUs to shard the model over
    pub num_gpus: u32,
    /// Device list exported as `CUDA_VISIBLE_DEVICES` to the engine
    pub visible_devices: String,
    /// Weight precision
    pub dtype: String,
    /// Fraction of device memory the engine may claim, in (0, 1]
    pub gpu_memory_utilization: f32,
    /// Context length cap
    pub max_model_len: Option<u32>,
    /// Jinja chat template file; without one, prompts are sent as raw text
    pub chat_template: Option<PathBuf>,
    /// Beginning-of-sequence token exposed to the chat template
    pub bos_token: String,
    /// End-of-sequence token exposed to the chat template
    pub eos_token: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Start the engine as a child process instead of connecting to a running one
    pub launch: bool,
    /// Engine executable used when `launch` is set
    pub program: String,
    /// Port the launched engine listens on
    pub port: u16,
    /// Seconds to wait for a launched engine to answer
    pub startup_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::DEFAULT_ENGINE_ENDPOINT.to_string(),
            num_gpus: 1,
            visible_devices: "0".to_string(),
            dtype: "bfloat16".to_string(),
            gpu_memory_utilization: 0.98,
            max_model_len: None,
            chat_template: None,
            bos_token: String::new(),
            eos_token: String::new(),
            timeout_secs: defaults::DEFAULT_TIMEOUT_SECS,
            launch: false,
            program: "vllm".to_string(),
            port: 8000,
            startup_timeout_secs: 600,
        }
    }
}
