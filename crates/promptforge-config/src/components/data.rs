//! Data file locations

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults;

/// Where the example set and prompt registry live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// JSON object of example query → answer
    pub examples: PathBuf,
    /// JSON object of model identifier → artifact path
    pub model_mapping: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            examples: PathBuf::from(defaults::DEFAULT_EXAMPLES_PATH),
            model_mapping: PathBuf::from(defaults::DEFAULT_MODEL_MAPPING_PATH),
        }
    }
}
