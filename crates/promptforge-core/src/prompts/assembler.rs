//! Builds the system prompt, the user turn and the backend payload

use tracing::debug;

use super::templates::{compose_system_prompt, format_user_prompt, DEFAULT_SYSTEM_PROMPT};
use crate::error::LlmResult;
use crate::registry::OptimizedPrompt;
use crate::retrieval::ExampleRetriever;
use crate::types::{BackendCapabilities, ChatMessage, GenerationFlags, Prompt};

/// Combines the optimized prompt with retrieved examples
#[derive(Debug)]
pub struct PromptAssembler {
    optimized_prompt: OptimizedPrompt,
    retriever: ExampleRetriever,
}

impl PromptAssembler {
    /// Create an assembler for one model
    pub fn new(optimized_prompt: OptimizedPrompt, retriever: ExampleRetriever) -> Self {
        Self {
            optimized_prompt,
            retriever,
        }
    }

    /// Base prompt selected by the `optimized_prompt` flag
    pub fn base_prompt(&self, flags: &GenerationFlags) -> &str {
        if flags.optimized_prompt {
            self.optimized_prompt.text()
        } else {
            DEFAULT_SYSTEM_PROMPT
        }
    }

    /// System prompt for `query`
    ///
    /// Examples are retrieved only when `optimized_icl` is set; otherwise the
    /// base prompt is returned untouched whatever `num_optimized_icl` says.
    pub async fn system_prompt(&self, query: &str, flags: &GenerationFlags) -> LlmResult<String> {
        let base = self.base_prompt(flags);
        if !flags.optimized_icl {
            return Ok(base.to_string());
        }

        let examples = self
            .retriever
            .retrieve(query, flags.num_optimized_icl)
            .await?;
        debug!(examples = examples.len(), "Appending retrieved examples");

        Ok(compose_system_prompt(
            base,
            examples.iter().map(|(q, a)| (q.as_str(), a.as_str())),
        ))
    }

    /// User turn for `query`
    pub fn user_prompt(&self, query: &str) -> String {
        format_user_prompt(query)
    }

    /// Shape the two prompts for a backend
    ///
    /// Backends that take messages or own a chat template get a
    /// `[system, user]` conversation; anything else gets plain text joined by a
    /// blank line.
    pub fn payload(
        system_prompt: String,
        user_prompt: String,
        capabilities: &BackendCapabilities,
    ) -> Prompt {
        if capabilities.prefers_messages() {
            Prompt::Messages(vec![
                ChatMessage::system(system_prompt),
                ChatMessage::user(user_prompt),
            ])
        } else {
            Prompt::Text(format!("{}\n\n{}", system_prompt, user_prompt))
        }
    }

    /// Full payload for `query`
    pub async fn assemble(
        &self,
        query: &str,
        flags: &GenerationFlags,
        capabilities: &BackendCapabilities,
    ) -> LlmResult<Prompt> {
        let system_prompt = self.system_prompt(query, flags).await?;
        let user_prompt = self.user_prompt(query);
        Ok(Self::payload(system_prompt, user_prompt, capabilities))
    }

    /// The resolved optimized prompt
    pub fn optimized_prompt(&self) -> &OptimizedPrompt {
        &self.optimized_prompt
    }

    /// The example retriever
    pub fn retriever(&self) -> &ExampleRetriever {
        &self.retriever
    }
}
