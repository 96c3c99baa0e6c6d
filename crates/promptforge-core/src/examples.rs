//! Few-shot example set
//!
//! The set is a JSON object mapping example queries to their answers. File
//! order is kept so retrieval ties resolve the same way on every run.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LlmError, LlmResult};

/// Ordered, immutable query → answer mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExampleSet {
    examples: IndexMap<String, String>,
}

impl ExampleSet {
    /// Build a set from (query, answer) pairs; later duplicates overwrite earlier answers
    pub fn from_pairs<I, Q, A>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Q, A)>,
        Q: Into<String>,
        A: Into<String>,
    {
        Self {
            examples: pairs
                .into_iter()
                .map(|(q, a)| (q.into(), a.into()))
                .collect(),
        }
    }

    /// Parse a JSON object document
    pub fn from_json(json: &str) -> LlmResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| LlmError::ConfigError(format!("Invalid example set: {}", e)))
    }

    /// Load the example set from a JSON file
    pub fn load(path: impl AsRef<Path>) -> LlmResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LlmError::ConfigError(format!(
                "Failed to read example set {}: {}",
                path.display(),
                e
            ))
        })?;
        let set = Self::from_json(&content)?;
        debug!(path = %path.display(), examples = set.len(), "Loaded example set");
        Ok(set)
    }

    /// Answer for an example query
    pub fn answer(&self, query: &str) -> Option<&str> {
        self.examples.get(query).map(String::as_str)
    }

    /// Example queries in file order
    pub fn queries(&self) -> impl Iterator<Item = &str> {
        self.examples.keys().map(String::as_str)
    }

    /// (query, answer) pairs in file order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.examples.iter().map(|(q, a)| (q.as_str(), a.as_str()))
    }

    /// Number of examples
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// True when the set holds no examples
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}
