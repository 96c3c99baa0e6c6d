//! Nearest-neighbour retrieval of few-shot examples

pub mod index;
pub mod retriever;
pub mod similarity;

pub use index::EmbeddingIndex;
pub use retriever::{ExampleRetriever, ScoredExample};
pub use similarity::cosine_similarity;
