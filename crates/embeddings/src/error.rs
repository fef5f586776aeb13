//! Error types for the embeddings module

use std::fmt;

/// Errors that can occur during embedding operations
#[derive(Debug)]
pub enum EmbeddingError {
    /// The dimension probe at start-up returned no usable vector
    ProbeFailed(String),

    /// Inference failed
    InferenceError(String),

    /// Returned vector has the wrong length
    DimensionMismatch { expected: usize, actual: usize },

    /// Unsupported provider
    UnsupportedProvider(String),

    /// Configuration error
    ConfigError(String),
}

impl fmt::Display for EmbeddingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProbeFailed(msg) => write!(f, "Embedding dimension probe failed: {msg}"),
            Self::InferenceError(msg) => write!(f, "Inference failed: {msg}"),
            Self::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {expected}, got {actual}")
            }
            Self::UnsupportedProvider(provider) => {
                write!(f, "Unsupported embedding provider: {provider}")
            }
            Self::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for EmbeddingError {}

impl From<EmbeddingError> for barkeep_core::error::Error {
    fn from(err: EmbeddingError) -> Self {
        barkeep_core::error::Error::Embedding(err.to_string())
    }
}
