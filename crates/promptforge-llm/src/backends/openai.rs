//! Hosted chat-completion backend (OpenAI-compatible API)

use async_trait::async_trait;
use promptforge_config::OpenAIBackendConfig;
use promptforge_core::{
    BackendCapabilities, ChatMessage, Generation, GenerationBackend, GenerationRequest, LlmError,
    LlmResult, Prompt, SamplingParams,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use super::merge_extra;

/// Hosted chat API backend
pub struct OpenAIChatBackend {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    seed: u64,
}

impl std::fmt::Debug for OpenAIChatBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIChatBackend")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("seed", &self.seed)
            .finish()
    }
}

impl OpenAIChatBackend {
    /// Create a backend with an explicit API key
    ///
    /// The timeout applies to both connecting and the whole request.
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        model: String,
        timeout_secs: u64,
        seed: u64,
    ) -> LlmResult<Self> {
        if api_key.trim().is_empty() {
            return Err(LlmError::ConfigError("API key is empty".to_string()));
        }

        let timeout = Duration::from_secs(timeout_secs);
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
                .trim_end_matches('/')
                .to_string(),
            model,
            seed,
        })
    }

    /// Create a backend, reading the API key from the configured environment variable
    ///
    /// Fails with `ConfigError` when the variable is unset or empty; no network
    /// call is made in that case.
    pub fn from_env(config: &OpenAIBackendConfig, model: &str) -> LlmResult<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                LlmError::ConfigError(format!(
                    "{} not set, please run `export {}=<your key>` to set it",
                    config.api_key_env, config.api_key_env
                ))
            })?;

        Self::new(
            api_key,
            Some(config.base_url.clone()),
            model.to_string(),
            config.timeout_secs,
            config.seed,
        )
    }

    /// Run a single exchange built from a user turn and an optional system prompt
    pub async fn complete(
        &self,
        user_prompt: &str,
        system_prompt: Option<&str>,
        params: &SamplingParams,
    ) -> LlmResult<Generation> {
        self.chat(ChatMessage::conversation(system_prompt, user_prompt), params)
            .await
    }

    /// Send a conversation to the chat completions endpoint
    pub async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        params: &SamplingParams,
    ) -> LlmResult<Generation> {
        params.validate()?;
        if messages.is_empty() {
            return Err(LlmError::InvalidArgument(
                "At least one message is required".to_string(),
            ));
        }

        let body = self.request_body(&messages, params);
        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %self.model, n = params.num_return_sequences, "Sending chat completion");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::BackendUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::BackendUnavailable(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let mut parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        if parsed.choices.is_empty() {
            return Err(LlmError::InvalidResponse(
                "No choices in response".to_string(),
            ));
        }
        parsed.choices.sort_by_key(|c| c.index);

        let sequences = parsed
            .choices
            .into_iter()
            .map(|c| {
                c.message.content.ok_or_else(|| {
                    LlmError::InvalidResponse(format!("Choice {} has no text content", c.index))
                })
            })
            .collect::<LlmResult<Vec<_>>>()?;
        Generation::from_sequences(params.num_return_sequences, sequences)
    }

    fn request_body(&self, messages: &[ChatMessage], params: &SamplingParams) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": messages.iter().map(|m| json!({
                "role": m.role.as_str(),
                "content": m.content,
            })).collect::<Vec<_>>(),
            "temperature": params.temperature,
            "top_p": params.top_p,
            "max_tokens": params.max_new_tokens,
            "n": params.num_return_sequences,
            "seed": self.seed,
        });

        if !params.stop.is_empty() {
            body["stop"] = json!(params.stop);
        }
        if params.json_output {
            body["response_format"] = json!({ "type": "json_object" });
        }
        merge_extra(&mut body, &params.extra);
        body
    }
}

#[async_trait]
impl GenerationBackend for OpenAIChatBackend {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities {
            chat_messages: true,
            chat_template: false,
            multiple_sequences: true,
            json_output: true,
        }
    }

    async fn generate(&self, request: GenerationRequest) -> LlmResult<Generation> {
        let messages = match request.prompt {
            Prompt::Messages(messages) => messages,
            Prompt::Text(text) => vec![ChatMessage::user(text)],
        };
        self.chat(messages, &request.params).await
    }
}

// Chat completion response types
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    index: u32,
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
