//! Precomputed embeddings for every example query

use tracing::{debug, info};

use crate::error::{EmbeddingError, EmbeddingResult};
use crate::examples::ExampleSet;
use crate::traits::EmbeddingProvider;

/// Immutable snapshot of example-query embeddings
///
/// Entries follow the example set's order and every vector has the same length.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingIndex {
    entries: Vec<(String, Vec<f32>)>,
    dimensions: usize,
}

impl EmbeddingIndex {
    /// Embed every example query
    ///
    /// Any provider failure aborts the build; there is no partial index.
    pub async fn build(
        examples: &ExampleSet,
        provider: &dyn EmbeddingProvider,
    ) -> EmbeddingResult<Self> {
        info!(
            model = provider.model_name(),
            examples = examples.len(),
            "Building example embedding index"
        );

        let mut entries = Vec::with_capacity(examples.len());
        let mut dimensions = provider.dimensions();

        for query in examples.queries() {
            let vector = provider.embed(query).await?;
            if vector.is_empty() {
                return Err(EmbeddingError::InvalidResponse(format!(
                    "Empty embedding for example query: {}",
                    query
                )));
            }
            match dimensions {
                None => dimensions = Some(vector.len()),
                Some(expected) if vector.len() != expected => {
                    return Err(EmbeddingError::DimensionMismatch {
                        expected,
                        actual: vector.len(),
                    });
                }
                Some(_) => {}
            }
            entries.push((query.to_string(), vector));
        }

        let dimensions = dimensions.unwrap_or(0);
        debug!(entries = entries.len(), dimensions, "Embedding index ready");
        Ok(Self {
            entries,
            dimensions,
        })
    }

    /// Build directly from precomputed vectors
    pub fn from_entries(entries: Vec<(String, Vec<f32>)>) -> EmbeddingResult<Self> {
        let dimensions = entries.first().map(|(_, v)| v.len()).unwrap_or(0);
        if let Some((query, _)) = entries.iter().find(|(_, v)| v.is_empty()) {
            return Err(EmbeddingError::InvalidResponse(format!(
                "Empty embedding for example query: {}",
                query
            )));
        }
        if let Some((_, bad)) = entries.iter().find(|(_, v)| v.len() != dimensions) {
            return Err(EmbeddingError::DimensionMismatch {
                expected: dimensions,
                actual: bad.len(),
            });
        }
        Ok(Self {
            entries,
            dimensions,
        })
    }

    /// Vector stored for an example query
    pub fn get(&self, query: &str) -> Option<&[f32]> {
        self.entries
            .iter()
            .find(|(q, _)| q == query)
            .map(|(_, v)| v.as_slice())
    }

    /// (query, vector) pairs in example-set order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.entries.iter().map(|(q, v)| (q.as_str(), v.as_slice()))
    }

    /// Vector length shared by all entries (0 when empty)
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no examples were indexed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
