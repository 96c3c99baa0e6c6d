//! Configuration sections

pub mod backends;
pub mod data;
pub mod defaults;
pub mod embedding;
pub mod generation;

pub use backends::{BackendKind, EngineConfig, ModelConfig, OpenAIBackendConfig};
pub use data::DataConfig;
pub use embedding::{EmbeddingConfig, EmbeddingProviderType};
pub use generation::GenerationDefaults;
