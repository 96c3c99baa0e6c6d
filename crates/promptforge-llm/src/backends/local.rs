//! Self-hosted inference engine backend
//!
//! Talks to an engine exposing an OpenAI-compatible `/completions` endpoint
//! (vLLM, llama.cpp server, TGI). The engine takes a single prompt string;
//! chat messages are rendered through the model's chat template first.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use promptforge_config::EngineConfig;
use promptforge_core::{
    BackendCapabilities, ChatMessage, Generation, GenerationBackend, GenerationRequest, LlmError,
    LlmResult, Prompt, SamplingParams,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::process::Child;
use tracing::debug;

use super::{merge_extra, ChatTemplate, EngineLauncher};

/// Self-hosted engine backend
pub struct LocalEngineBackend {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    template: Option<ChatTemplate>,
    // Launched engine; killed when the backend is dropped
    engine: Option<Mutex<Child>>,
}

impl std::fmt::Debug for LocalEngineBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalEngineBackend")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("chat_template", &self.template.is_some())
            .field("launched", &self.engine.is_some())
            .finish()
    }
}

impl LocalEngineBackend {
    /// Connect to an engine that is already running at `config.endpoint`
    pub fn connect(model: impl Into<String>, config: &EngineConfig) -> LlmResult<Self> {
        let template = config
            .chat_template
            .as_deref()
            .map(|path| ChatTemplate::from_file(path, &config.bos_token, &config.eos_token))
            .transpose()?;

        Ok(Self {
            client: build_client(config.timeout_secs)?,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: model.into(),
            template,
            engine: None,
        })
    }

    /// Start the engine as a child process and wait for it to come up
    pub async fn launch(model: impl Into<String>, config: &EngineConfig) -> LlmResult<Self> {
        let model = model.into();
        let launcher = EngineLauncher::new(model.clone(), config.clone());
        let child = launcher.spawn()?;

        let mut backend = Self::connect(
            model,
            &EngineConfig {
                endpoint: launcher.endpoint(),
                ..config.clone()
            },
        )?;
        backend.engine = Some(Mutex::new(child));

        EngineLauncher::wait_until_ready(
            &backend.client,
            &backend.endpoint,
            Duration::from_secs(config.startup_timeout_secs),
        )
        .await?;
        Ok(backend)
    }

    /// Use an already compiled chat template
    pub fn with_template(mut self, template: ChatTemplate) -> Self {
        self.template = Some(template);
        self
    }

    /// Base URL requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a rendered prompt to the completions endpoint
    pub async fn complete(&self, prompt: &str, params: &SamplingParams) -> LlmResult<Generation> {
        params.validate()?;
        if params.json_output {
            return Err(LlmError::InvalidArgument(
                "json_output is not supported by the local engine backend".to_string(),
            ));
        }

        let body = self.request_body(prompt, params);
        let url = format!("{}/completions", self.endpoint);
        debug!(model = %self.model, n = params.num_return_sequences, "Sending completion");

        let response = self
            .client
            .post(&url)
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
                "Engine error ({}): {}",
                status, error_text
            )));
        }

        let mut parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        if parsed.choices.is_empty() {
            return Err(LlmError::InvalidResponse(
                "No choices in response".to_string(),
            ));
        }
        parsed.choices.sort_by_key(|c| c.index);

        Generation::from_sequences(
            params.num_return_sequences,
            parsed.choices.into_iter().map(|c| c.text).collect(),
        )
    }

    fn request_body(&self, prompt: &str, params: &SamplingParams) -> Value {
        let mut body = json!({
            "model": self.model,
            "prompt": prompt,
            "temperature": params.temperature,
            "top_p": params.top_p,
            "max_tokens": params.max_new_tokens,
            "n": params.num_return_sequences,
        });
        if !params.stop.is_empty() {
            body["stop"] = json!(params.stop);
        }
        merge_extra(&mut body, &params.extra);
        body
    }
}

#[async_trait]
impl GenerationBackend for LocalEngineBackend {
    fn provider_name(&self) -> &str {
        "local"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities {
            chat_messages: false,
            chat_template: self.template.is_some(),
            multiple_sequences: true,
            json_output: false,
        }
    }

    fn apply_chat_template(&self, messages: &[ChatMessage]) -> LlmResult<String> {
        match &self.template {
            Some(template) => template.render(messages),
            None => Err(LlmError::InvalidArgument(format!(
                "Model {} has no chat template; send raw text instead",
                self.model
            ))),
        }
    }

    async fn generate(&self, request: GenerationRequest) -> LlmResult<Generation> {
        let prompt = match &request.prompt {
            Prompt::Text(text) => text.clone(),
            Prompt::Messages(messages) => self.apply_chat_template(messages)?,
        };
        self.complete(&prompt, &request.params).await
    }
}

fn build_client(timeout_secs: u64) -> LlmResult<reqwest::Client> {
    let timeout = Duration::from_secs(timeout_secs);
    reqwest::Client::builder()
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::ConfigError(format!("Failed to build HTTP client: {}", e)))
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    index: u32,
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> LocalEngineBackend {
        LocalEngineBackend::connect("local-model", &EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_capabilities_follow_template() {
        let raw = backend();
        assert!(!raw.capabilities().prefers_messages());

        let templated =
            backend().with_template(ChatTemplate::new("{{ messages[0].content }}", "", "").unwrap());
        assert!(templated.capabilities().prefers_messages());
    }

    #[test]
    fn test_messages_without_template_rejected() {
        let err = backend()
            .apply_chat_template(&[ChatMessage::user("hi")])
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_missing_template_file_is_config_error() {
        let config = EngineConfig {
            chat_template: Some("/nonexistent/template.jinja".into()),
            ..Default::default()
        };
        let err = LocalEngineBackend::connect("m", &config).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_request_body() {
        let params = SamplingParams {
            stop: vec!["</s>".into()],
            num_return_sequences: 4,
            ..Default::default()
        };
        let body = backend().request_body("prompt text", &params);
        assert_eq!(body["prompt"], "prompt text");
        assert_eq!(body["model"], "local-model");
        assert_eq!(body["n"], 4);
        assert_eq!(body["stop"], json!(["</s>"]));
        assert!(body.get("messages").is_none());
    }

    #[tokio::test]
    async fn test_json_output_rejected_before_request() {
        let params = SamplingParams {
            json_output: true,
            ..Default::default()
        };
        let err = backend().complete("p", &params).await.unwrap_err();
        assert!(err.is_invalid_argument());
    }
}
