//! Mock Implementations for Testing
//!
//! In-memory stand-ins for the embedding provider and the generation backend.
//! Both are deterministic and record every call so tests can assert on what
//! did (or did not) reach them.
//!
//! ```rust
//! use promptforge_core::test_support::mocks::MockBackend;
//! use promptforge_core::traits::GenerationBackend;
//!
//! let backend = MockBackend::new("mock-model").with_response("hello");
//! assert_eq!(backend.model_name(), "mock-model");
//! assert_eq!(backend.call_count(), 0);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{EmbeddingError, EmbeddingResult, LlmError, LlmResult};
use crate::traits::{EmbeddingProvider, GenerationBackend};
use crate::types::{BackendCapabilities, ChatMessage, Generation, GenerationRequest};

/// Deterministic bag-of-words embedding provider
///
/// Each lower-cased word is hashed into one of `dimensions` buckets, so texts
/// sharing words point in similar directions and identical texts have
/// similarity 1.0. Specific vectors can be pinned with [`Self::set_embedding`].
pub struct MockEmbeddingProvider {
    dimensions: usize,
    overrides: Mutex<HashMap<String, Vec<f32>>>,
    failures: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
}

impl MockEmbeddingProvider {
    /// Create a provider producing vectors of the given length
    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
            overrides: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Pin the vector returned for `text`
    pub fn set_embedding(&self, text: &str, vector: Vec<f32>) {
        self.overrides
            .lock()
            .unwrap()
            .insert(text.to_string(), vector);
    }

    /// Make embedding `text` fail with an HTTP error
    pub fn fail_on(&self, text: &str) {
        self.failures.lock().unwrap().insert(text.to_string());
    }

    /// Number of embed calls so far
    pub fn embed_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Texts embedded so far, in call order
    pub fn embed_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn bag_of_words(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        for word in text.split_whitespace() {
            let word: String = word
                .chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect();
            if word.is_empty() {
                continue;
            }
            let mut hasher = DefaultHasher::new();
            word.hash(&mut hasher);
            let bucket = (hasher.finish() % self.dimensions as u64) as usize;
            vector[bucket] += 1.0;
        }
        vector
    }
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::with_dimensions(64)
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        self.calls.lock().unwrap().push(text.to_string());

        if self.failures.lock().unwrap().contains(text) {
            return Err(EmbeddingError::HttpError(format!(
                "mock failure for '{}'",
                text
            )));
        }
        if let Some(vector) = self.overrides.lock().unwrap().get(text) {
            return Ok(vector.clone());
        }
        Ok(self.bag_of_words(text))
    }

    fn model_name(&self) -> &str {
        "mock-embedding"
    }

    fn dimensions(&self) -> Option<usize> {
        None
    }
}

/// Backend that records requests and returns a canned response
pub struct MockBackend {
    model_name: String,
    capabilities: BackendCapabilities,
    response: String,
    failure: Mutex<Option<String>>,
    calls: Mutex<Vec<GenerationRequest>>,
}

impl MockBackend {
    /// Create a raw-text backend with no chat capabilities
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            capabilities: BackendCapabilities {
                multiple_sequences: true,
                ..Default::default()
            },
            response: "This is a mock response.".to_string(),
            failure: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Override the advertised capabilities
    pub fn with_capabilities(mut self, capabilities: BackendCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Override the canned response
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = response.into();
        self
    }

    /// Make every subsequent call fail with `BackendUnavailable`
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    /// Requests received so far
    pub fn calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of requests received so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn capabilities(&self) -> BackendCapabilities {
        self.capabilities
    }

    fn apply_chat_template(&self, messages: &[ChatMessage]) -> LlmResult<String> {
        if !self.capabilities.chat_template {
            return Err(LlmError::InvalidArgument(
                "mock has no chat template".to_string(),
            ));
        }
        let mut out = String::new();
        for message in messages {
            out.push_str(&format!("<|{}|>\n{}\n", message.role.as_str(), message.content));
        }
        out.push_str("<|assistant|>\n");
        Ok(out)
    }

    async fn generate(&self, request: GenerationRequest) -> LlmResult<Generation> {
        self.calls.lock().unwrap().push(request.clone());

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(LlmError::BackendUnavailable(message));
        }
        request.params.validate()?;

        let n = request.params.num_return_sequences;
        let sequences = (0..n).map(|_| self.response.clone()).collect();
        Generation::from_sequences(n, sequences)
    }
}
