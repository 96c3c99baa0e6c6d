//! Top-k example retrieval by cosine similarity

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::index::EmbeddingIndex;
use super::similarity::cosine_similarity;
use crate::error::{EmbeddingError, LlmError, LlmResult};
use crate::examples::ExampleSet;
use crate::traits::EmbeddingProvider;

/// An example query with its similarity to the user query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredExample {
    /// Cosine similarity in [-1, 1]
    pub similarity: f32,
    /// The stored example query
    pub query: String,
}

/// Ranks stored examples against incoming queries
pub struct ExampleRetriever {
    examples: ExampleSet,
    index: EmbeddingIndex,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl std::fmt::Debug for ExampleRetriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExampleRetriever")
            .field("examples", &self.examples.len())
            .field("dimensions", &self.index.dimensions())
            .field("embedder", &self.embedder.model_name())
            .finish()
    }
}

impl ExampleRetriever {
    /// Embed the example set and keep the index
    pub async fn build(
        examples: ExampleSet,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> LlmResult<Self> {
        let index = EmbeddingIndex::build(&examples, embedder.as_ref()).await?;
        Ok(Self {
            examples,
            index,
            embedder,
        })
    }

    /// Assemble from an index that was built elsewhere
    pub fn from_parts(
        examples: ExampleSet,
        index: EmbeddingIndex,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> LlmResult<Self> {
        let same_keys = index.len() == examples.len()
            && index.iter().zip(examples.queries()).all(|((a, _), b)| a == b);
        if !same_keys {
            return Err(LlmError::ConfigError(
                "Embedding index does not match the example set".to_string(),
            ));
        }
        Ok(Self {
            examples,
            index,
            embedder,
        })
    }

    /// The k stored examples most similar to `query`, best first
    ///
    /// Returns `min(k, |examples|)` entries. Equal similarities keep example-set
    /// order.
    pub async fn top_k(&self, query: &str, k: usize) -> LlmResult<Vec<ScoredExample>> {
        if k == 0 {
            return Err(LlmError::InvalidArgument(
                "Number of examples to retrieve must be > 0".to_string(),
            ));
        }
        if self.index.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.embed(query).await?;
        if query_vector.len() != self.index.dimensions() {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.index.dimensions(),
                actual: query_vector.len(),
            }
            .into());
        }

        let mut scored: Vec<ScoredExample> = self
            .index
            .iter()
            .map(|(example, vector)| ScoredExample {
                similarity: cosine_similarity(vector, &query_vector),
                query: example.to_string(),
            })
            .collect();

        // sort_by is stable, so ties keep index order
        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
        });
        scored.truncate(k);

        debug!(
            k,
            returned = scored.len(),
            best = scored.first().map(|s| s.similarity),
            "Retrieved examples"
        );
        Ok(scored)
    }

    /// Top-k examples as (query, answer) pairs
    pub async fn retrieve(&self, query: &str, k: usize) -> LlmResult<Vec<(String, String)>> {
        let scored = self.top_k(query, k).await?;
        Ok(scored
            .into_iter()
            .filter_map(|s| {
                self.examples
                    .answer(&s.query)
                    .map(|answer| (s.query.clone(), answer.to_string()))
            })
            .collect())
    }

    /// The example set being searched
    pub fn examples(&self) -> &ExampleSet {
        &self.examples
    }

    /// The precomputed index
    pub fn index(&self) -> &EmbeddingIndex {
        &self.index
    }
}
