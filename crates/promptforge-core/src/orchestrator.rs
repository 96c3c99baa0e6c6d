//! Generation orchestration
//!
//! The [`Orchestrator`] owns everything that is fixed at startup (example set,
//! embedding index, optimized prompt, backend) and exposes one entry point,
//! [`Orchestrator::generate`], which runs retrieval, assembly and dispatch in
//! sequence.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{LlmError, LlmResult};
use crate::examples::ExampleSet;
use crate::prompts::PromptAssembler;
use crate::registry::{ModelPromptRegistry, OptimizedPrompt};
use crate::retrieval::ExampleRetriever;
use crate::traits::{EmbeddingProvider, GenerationBackend};
use crate::types::{Generation, GenerationFlags, GenerationRequest, Prompt, SamplingParams};

/// Startup-time assembly of an [`Orchestrator`]
#[derive(Default)]
pub struct OrchestratorBuilder {
    examples: Option<ExampleSet>,
    registry: Option<ModelPromptRegistry>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    backend: Option<Arc<dyn GenerationBackend>>,
}

impl OrchestratorBuilder {
    /// Few-shot examples to retrieve from
    pub fn examples(mut self, examples: ExampleSet) -> Self {
        self.examples = Some(examples);
        self
    }

    /// Registry used to resolve the optimized prompt
    pub fn registry(mut self, registry: ModelPromptRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Embedding provider for the example index and incoming queries
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// The generation backend
    pub fn backend(mut self, backend: Arc<dyn GenerationBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Build the embedding index and resolve the optimized prompt
    pub async fn build(self) -> LlmResult<Orchestrator> {
        let backend = self
            .backend
            .ok_or_else(|| LlmError::ConfigError("No generation backend configured".into()))?;
        let embedder = self
            .embedder
            .ok_or_else(|| LlmError::ConfigError("No embedding provider configured".into()))?;
        let examples = self.examples.unwrap_or_default();
        let registry = self.registry.unwrap_or_default();

        let retriever = ExampleRetriever::build(examples, embedder).await?;
        let optimized_prompt = OptimizedPrompt::resolve(&registry, backend.model_name());

        info!(
            provider = backend.provider_name(),
            model = backend.model_name(),
            examples = retriever.examples().len(),
            default_prompt = optimized_prompt.is_default(),
            "Orchestrator ready"
        );

        Ok(Orchestrator::new(
            PromptAssembler::new(optimized_prompt, retriever),
            backend,
        ))
    }
}

/// Maps (query, flags, sampling params) to one backend call
pub struct Orchestrator {
    assembler: PromptAssembler,
    backend: Arc<dyn GenerationBackend>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("assembler", &self.assembler)
            .field("provider", &self.backend.provider_name())
            .field("model", &self.backend.model_name())
            .finish()
    }
}

impl Orchestrator {
    /// Start building an orchestrator
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::default()
    }

    /// Wrap an assembler and backend that are already set up
    pub fn new(assembler: PromptAssembler, backend: Arc<dyn GenerationBackend>) -> Self {
        Self { assembler, backend }
    }

    /// Payload that `generate` would send for this query
    pub async fn assemble(&self, query: &str, flags: &GenerationFlags) -> LlmResult<Prompt> {
        flags.validate()?;
        self.assembler
            .assemble(query, flags, &self.backend.capabilities())
            .await
    }

    /// Generate a response for `query`
    ///
    /// Flags and sampling parameters are checked before any embedding or
    /// backend work, so a rejected call spends nothing. Backend errors are
    /// returned unchanged; nothing is retried.
    pub async fn generate(
        &self,
        query: &str,
        flags: &GenerationFlags,
        params: SamplingParams,
    ) -> LlmResult<Generation> {
        flags.validate()?;
        params.validate()?;

        let prompt = self
            .assembler
            .assemble(query, flags, &self.backend.capabilities())
            .await?;
        debug!(
            model = self.backend.model_name(),
            optimized_prompt = flags.optimized_prompt,
            optimized_icl = flags.optimized_icl,
            "Dispatching generation"
        );

        self.backend
            .generate(GenerationRequest::new(prompt, params))
            .await
    }

    /// The resolved optimized prompt
    pub fn optimized_prompt(&self) -> &OptimizedPrompt {
        self.assembler.optimized_prompt()
    }

    /// The example retriever
    pub fn retriever(&self) -> &ExampleRetriever {
        self.assembler.retriever()
    }

    /// The backend in use
    pub fn backend(&self) -> &Arc<dyn GenerationBackend> {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::mocks::{MockBackend, MockEmbeddingProvider};
    use crate::types::{BackendCapabilities, ChatMessage};

    fn examples() -> ExampleSet {
        ExampleSet::from_pairs([
            ("Translate hello to French", "Bonjour"),
            ("Translate goodbye to French", "Au revoir"),
            ("What is 2 + 2?", "4"),
        ])
    }

    async fn orchestrator(
        backend: Arc<MockBackend>,
    ) -> (Orchestrator, Arc<MockEmbeddingProvider>) {
        let embedder = Arc::new(MockEmbeddingProvider::with_dimensions(64));
        let orchestrator = Orchestrator::builder()
            .examples(examples())
            .embedder(embedder.clone())
            .backend(backend)
            .build()
            .await
            .unwrap();
        (orchestrator, embedder)
    }

    #[tokio::test]
    async fn test_zero_examples_fails_before_backend_call() {
        let backend = Arc::new(MockBackend::new("mock-model"));
        let (orchestrator, embedder) = orchestrator(backend.clone()).await;
        let embeds_after_startup = embedder.embed_count();

        let flags = GenerationFlags {
            optimized_prompt: true,
            optimized_icl: true,
            num_optimized_icl: 0,
        };
        let err = orchestrator
            .generate("Translate cat to French", &flags, SamplingParams::default())
            .await
            .unwrap_err();

        assert!(err.is_invalid_argument());
        assert_eq!(backend.call_count(), 0);
        assert_eq!(embedder.embed_count(), embeds_after_startup);
    }

    #[tokio::test]
    async fn test_bad_sampling_params_fail_before_backend_call() {
        let backend = Arc::new(MockBackend::new("mock-model"));
        let (orchestrator, _) = orchestrator(backend.clone()).await;

        let params = SamplingParams {
            top_p: 1.5,
            ..Default::default()
        };
        let err = orchestrator
            .generate("q", &GenerationFlags::default(), params)
            .await
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unregistered_model_uses_default_prompt() {
        let backend = Arc::new(MockBackend::new("unknown-model"));
        let (orchestrator, _) = orchestrator(backend).await;
        assert_eq!(
            orchestrator.optimized_prompt().text(),
            "You are a helpful assistant"
        );
    }

    #[tokio::test]
    async fn test_raw_backend_receives_concatenated_text() {
        let backend = Arc::new(MockBackend::new("mock-model").with_response("Chat"));
        let (orchestrator, _) = orchestrator(backend.clone()).await;

        let flags = GenerationFlags {
            optimized_prompt: false,
            optimized_icl: false,
            num_optimized_icl: 3,
        };
        let generation = orchestrator
            .generate("Translate cat to French", &flags, SamplingParams::default())
            .await
            .unwrap();
        assert_eq!(generation, Generation::Single("Chat".into()));

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].prompt,
            Prompt::Text(
                "You are a helpful assistant\n\n# Query:\nTranslate cat to French\n\n# Answer:\n<START>"
                    .into()
            )
        );
    }

    #[tokio::test]
    async fn test_chat_backend_receives_messages_with_examples() {
        let backend = Arc::new(MockBackend::new("mock-model").with_capabilities(
            BackendCapabilities {
                chat_messages: true,
                ..Default::default()
            },
        ));
        let (orchestrator, _) = orchestrator(backend.clone()).await;

        let flags = GenerationFlags {
            optimized_prompt: true,
            optimized_icl: true,
            num_optimized_icl: 1,
        };
        orchestrator
            .generate("Translate hello to French", &flags, SamplingParams::default())
            .await
            .unwrap();

        let calls = backend.calls();
        let Prompt::Messages(messages) = &calls[0].prompt else {
            panic!("expected chat messages");
        };
        assert_eq!(messages.len(), 2);
        assert_eq!(
            messages[0],
            ChatMessage::system(
                "You are a helpful assistant\n\n#Query:\nTranslate hello to French\n\n#Answer:\nBonjour"
            )
        );
        assert_eq!(
            messages[1],
            ChatMessage::user("# Query:\nTranslate hello to French\n\n# Answer:\n<START>")
        );
    }

    #[tokio::test]
    async fn test_backend_errors_propagate_unchanged() {
        let backend = Arc::new(MockBackend::new("mock-model"));
        backend.fail_with("connection reset");
        let (orchestrator, _) = orchestrator(backend.clone()).await;

        let err = orchestrator
            .generate("q", &GenerationFlags::default(), SamplingParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::BackendUnavailable(ref m) if m == "connection reset"));
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_builder_requires_backend() {
        let result = Orchestrator::builder()
            .embedder(Arc::new(MockEmbeddingProvider::default()))
            .build()
            .await;
        assert!(result.unwrap_err().is_config_error());
    }
}
