//! Seams between orchestration and the outside world
//!
//! Core defines the traits; `promptforge-llm` provides the HTTP implementations
//! and `test_support` provides in-memory ones.

pub mod backend;
pub mod embedding;

pub use backend::GenerationBackend;
pub use embedding::EmbeddingProvider;
