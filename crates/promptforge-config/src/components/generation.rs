//! Default per-call generation settings

use serde::{Deserialize, Serialize};

/// Defaults applied when a caller does not specify flags or sampling params
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationDefaults {
    /// Use the optimized system prompt
    pub optimized_prompt: bool,
    /// Append retrieved few-shot examples
    pub optimized_icl: bool,
    /// Number of examples to retrieve
    pub num_optimized_icl: usize,
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling mass
    pub top_p: f32,
    /// Maximum new tokens
    pub max_new_tokens: u32,
    /// Stop sequences
    pub stop: Vec<String>,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            optimized_prompt: true,
            optimized_icl: true,
            num_optimized_icl: 3,
            temperature: 0.7,
            top_p: 0.95,
            max_new_tokens: 512,
            stop: Vec::new(),
        }
    }
}
