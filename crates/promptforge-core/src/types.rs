//! Request and response types that cross the backend boundary

use serde::{Deserialize, Serialize};

use crate::error::{LlmError, LlmResult};

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instructions
    System,
    /// End-user turn
    User,
    /// Model turn
    Assistant,
}

impl MessageRole {
    /// Wire name used by chat APIs and chat templates
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// One role/content pair of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who is speaking
    pub role: MessageRole,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }

    /// Build the `[system?, user]` conversation used for a single exchange
    pub fn conversation(system: Option<&str>, user: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(user));
        messages
    }
}

/// Payload handed to a backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Prompt {
    /// Fully formatted text, sent as-is
    Text(String),
    /// Structured conversation, templated by the backend
    Messages(Vec<ChatMessage>),
}

/// Sampling parameters shared by every backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingParams {
    /// Sampling temperature, must be >= 0
    pub temperature: f32,
    /// Nucleus sampling mass, must be in (0, 1]
    pub top_p: f32,
    /// Maximum number of tokens to generate
    pub max_new_tokens: u32,
    /// Sequences at which generation stops
    pub stop: Vec<String>,
    /// Number of completions to return
    pub num_return_sequences: u32,
    /// Ask the backend for a strict JSON object
    pub json_output: bool,
    /// Backend-specific parameters merged into the request body untouched
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.95,
            max_new_tokens: 512,
            stop: Vec::new(),
            num_return_sequences: 1,
            json_output: false,
            extra: serde_json::Map::new(),
        }
    }
}

impl SamplingParams {
    /// Check ranges before anything is sent to a backend
    pub fn validate(&self) -> LlmResult<()> {
        if !(self.temperature >= 0.0) {
            return Err(LlmError::InvalidArgument(format!(
                "temperature must be >= 0, got {}",
                self.temperature
            )));
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(LlmError::InvalidArgument(format!(
                "top_p must be in (0, 1], got {}",
                self.top_p
            )));
        }
        if self.max_new_tokens == 0 {
            return Err(LlmError::InvalidArgument(
                "max_new_tokens must be > 0".to_string(),
            ));
        }
        if self.num_return_sequences == 0 {
            return Err(LlmError::InvalidArgument(
                "num_return_sequences must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// A single call into a backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Text or conversation to continue
    pub prompt: Prompt,
    /// Sampling parameters
    pub params: SamplingParams,
}

impl GenerationRequest {
    /// Create a request
    pub fn new(prompt: Prompt, params: SamplingParams) -> Self {
        Self { prompt, params }
    }
}

/// Generated output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Generation {
    /// Exactly one sequence was requested
    Single(String),
    /// Several sequences, in response order
    Multiple(Vec<String>),
}

impl Generation {
    /// Wrap backend output according to how many sequences were requested
    ///
    /// A response carrying any other number of sequences is `InvalidResponse`.
    pub fn from_sequences(requested: u32, mut sequences: Vec<String>) -> LlmResult<Self> {
        if sequences.is_empty() || sequences.len() != requested as usize {
            return Err(LlmError::InvalidResponse(format!(
                "Requested {} sequences, backend returned {}",
                requested,
                sequences.len()
            )));
        }
        if requested == 1 {
            Ok(Generation::Single(sequences.remove(0)))
        } else {
            Ok(Generation::Multiple(sequences))
        }
    }

    /// Number of sequences carried
    pub fn len(&self) -> usize {
        match self {
            Generation::Single(_) => 1,
            Generation::Multiple(all) => all.len(),
        }
    }

    /// True when no sequences were returned
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First sequence, if any
    pub fn first(&self) -> Option<&str> {
        match self {
            Generation::Single(text) => Some(text),
            Generation::Multiple(all) => all.first().map(String::as_str),
        }
    }

    /// All sequences as a vector
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Generation::Single(text) => vec![text],
            Generation::Multiple(all) => all,
        }
    }
}

/// Per-call switches controlling prompt assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationFlags {
    /// Use the model's optimized system prompt instead of the default one
    pub optimized_prompt: bool,
    /// Append retrieved few-shot examples to the system prompt
    pub optimized_icl: bool,
    /// How many examples to retrieve when `optimized_icl` is set
    pub num_optimized_icl: usize,
}

impl Default for GenerationFlags {
    fn default() -> Self {
        Self {
            optimized_prompt: true,
            optimized_icl: true,
            num_optimized_icl: 3,
        }
    }
}

impl GenerationFlags {
    /// Reject an example request that would retrieve nothing
    pub fn validate(&self) -> LlmResult<()> {
        if self.optimized_icl && self.num_optimized_icl == 0 {
            return Err(LlmError::InvalidArgument(
                "Number of ICL examples should be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// What a backend can do with a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BackendCapabilities {
    /// Accepts structured chat messages natively
    pub chat_messages: bool,
    /// Can turn messages into text with its own chat template
    pub chat_template: bool,
    /// Honors `num_return_sequences > 1`
    pub multiple_sequences: bool,
    /// Honors `json_output`
    pub json_output: bool,
}

impl BackendCapabilities {
    /// Whether the assembler should hand over a conversation instead of raw text
    pub fn prefers_messages(&self) -> bool {
        self.chat_messages || self.chat_template
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sampling_params_are_valid() {
        assert!(SamplingParams::default().validate().is_ok());
    }

    #[test]
    fn test_negative_temperature_rejected() {
        let params = SamplingParams {
            temperature: -0.1,
            ..Default::default()
        };
        assert!(params.validate().unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_top_p_bounds() {
        for top_p in [0.0, -0.5, 1.01, f32::NAN] {
            let params = SamplingParams {
                top_p,
                ..Default::default()
            };
            assert!(params.validate().is_err(), "top_p {} accepted", top_p);
        }
        let params = SamplingParams {
            top_p: 1.0,
            temperature: 0.0,
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_zero_sequences_rejected() {
        let params = SamplingParams {
            num_return_sequences: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_flags_require_positive_example_count() {
        let flags = GenerationFlags {
            optimized_icl: true,
            num_optimized_icl: 0,
            ..Default::default()
        };
        assert!(flags.validate().unwrap_err().is_invalid_argument());

        let flags = GenerationFlags {
            optimized_icl: false,
            num_optimized_icl: 0,
            ..Default::default()
        };
        assert!(flags.validate().is_ok());
    }

    #[test]
    fn test_generation_from_sequences() {
        assert_eq!(
            Generation::from_sequences(1, vec!["a".into()]).unwrap(),
            Generation::Single("a".into())
        );
        let multi =
            Generation::from_sequences(3, vec!["a".into(), "b".into(), "c".into()]).unwrap();
        assert_eq!(multi.len(), 3);
        assert_eq!(multi.first(), Some("a"));
    }

    #[test]
    fn test_generation_count_must_match_request() {
        let short = Generation::from_sequences(3, vec!["a".into(), "b".into()]);
        assert!(matches!(short, Err(LlmError::InvalidResponse(_))));

        let extra = Generation::from_sequences(1, vec!["a".into(), "b".into()]);
        assert!(matches!(extra, Err(LlmError::InvalidResponse(_))));

        let none = Generation::from_sequences(1, Vec::new());
        assert!(matches!(none, Err(LlmError::InvalidResponse(_))));
    }

    #[test]
    fn test_conversation_builder() {
        let messages = ChatMessage::conversation(Some("sys"), "hi");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[1].content, "hi");

        let messages = ChatMessage::conversation(None, "hi");
        assert_eq!(messages, vec![ChatMessage::user("hi")]);
    }
}
