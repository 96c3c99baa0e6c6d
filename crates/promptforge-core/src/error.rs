//! Error taxonomy shared by every promptforge crate

use thiserror::Error;

/// Result type for generation and orchestration operations
pub type LlmResult<T> = Result<T, LlmError>;

/// Result type for embedding operations
pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

/// Errors raised while assembling prompts or talking to a backend
#[derive(Debug, Error)]
pub enum LlmError {
    /// Missing credential, unreadable data file or otherwise unusable configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Caller supplied parameters outside their valid range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Optimized-prompt artifact could not be interpreted
    #[error("Artifact error: {0}")]
    ArtifactError(String),

    /// Network, HTTP status or resource failure reported by a backend
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Backend answered but the body could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Embedding provider failure
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
}

impl LlmError {
    /// True for errors caused by the caller's arguments
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, LlmError::InvalidArgument(_))
    }

    /// True for configuration errors
    pub fn is_config_error(&self) -> bool {
        matches!(self, LlmError::ConfigError(_))
    }
}

/// Errors raised by embedding providers
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Provider misconfigured (bad endpoint, missing key)
    #[error("Embedding configuration error: {0}")]
    ConfigError(String),

    /// Transport failure or non-success status
    #[error("Embedding HTTP error: {0}")]
    HttpError(String),

    /// Response body did not contain an embedding
    #[error("Invalid embedding response: {0}")]
    InvalidResponse(String),

    /// Vector length differs from the rest of the index
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension established by the first vector
        expected: usize,
        /// Dimension of the offending vector
        actual: usize,
    },
}
