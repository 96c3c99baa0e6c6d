//! # promptforge core
//!
//! Prompt orchestration in front of LLM backends: pick a system prompt
//! (optionally an optimized one), append few-shot examples retrieved by
//! embedding similarity, format the user turn and hand the result to a
//! [`GenerationBackend`].
//!
//! Concrete backends and embedding providers live in `promptforge-llm`; this
//! crate only defines the traits and the logic that runs through them.
//!
//! ```rust
//! use std::sync::Arc;
//! use promptforge_core::{ExampleSet, GenerationFlags, Orchestrator, SamplingParams};
//! use promptforge_core::test_support::{MockBackend, MockEmbeddingProvider};
//!
//! # async fn run() -> promptforge_core::LlmResult<()> {
//! let orchestrator = Orchestrator::builder()
//!     .examples(ExampleSet::from_pairs([("What is 2+2?", "4")]))
//!     .embedder(Arc::new(MockEmbeddingProvider::default()))
//!     .backend(Arc::new(MockBackend::new("mock-model")))
//!     .build()
//!     .await?;
//!
//! let output = orchestrator
//!     .generate("What is 3+3?", &GenerationFlags::default(), SamplingParams::default())
//!     .await?;
//! println!("{:?}", output.first());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod examples;
pub mod orchestrator;
pub mod prompts;
pub mod registry;
pub mod retrieval;
pub mod test_support;
pub mod traits;
pub mod types;

pub use error::{EmbeddingError, EmbeddingResult, LlmError, LlmResult};
pub use examples::ExampleSet;
pub use orchestrator::{Orchestrator, OrchestratorBuilder};
pub use prompts::{PromptAssembler, DEFAULT_SYSTEM_PROMPT};
pub use registry::{ModelPromptRegistry, OptimizedPrompt, PromptSource};
pub use retrieval::{cosine_similarity, EmbeddingIndex, ExampleRetriever, ScoredExample};
pub use traits::{EmbeddingProvider, GenerationBackend};
pub use types::{
    BackendCapabilities, ChatMessage, Generation, GenerationFlags, GenerationRequest,
    MessageRole, Prompt, SamplingParams,
};
