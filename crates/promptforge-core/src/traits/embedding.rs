//! Text embedding abstraction

use async_trait::async_trait;

use crate::error::EmbeddingResult;

/// Turns text into a fixed-dimension vector
///
/// Implementations are treated as black boxes: the same text must always map to
/// a vector of the same length.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>>;

    /// Model identifier, for logging
    fn model_name(&self) -> &str;

    /// Expected vector length, when known ahead of time
    fn dimensions(&self) -> Option<usize> {
        None
    }
}
