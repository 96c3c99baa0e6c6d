//! Generation backend abstraction

use async_trait::async_trait;

use crate::error::{LlmError, LlmResult};
use crate::types::{BackendCapabilities, ChatMessage, Generation, GenerationRequest};

/// A model that can continue a prompt
///
/// Exactly one implementation is chosen at startup; call sites never branch on
/// the concrete type, only on [`BackendCapabilities`].
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Short provider name ("openai", "local")
    fn provider_name(&self) -> &str;

    /// Model identifier, also the key into the prompt registry
    fn model_name(&self) -> &str;

    /// Capabilities used by the prompt assembler
    fn capabilities(&self) -> BackendCapabilities;

    /// Render a conversation with the backend's chat template
    fn apply_chat_template(&self, _messages: &[ChatMessage]) -> LlmResult<String> {
        Err(LlmError::InvalidArgument(format!(
            "{} has no chat template",
            self.provider_name()
        )))
    }

    /// Run one generation call
    async fn generate(&self, request: GenerationRequest) -> LlmResult<Generation>;
}
