//! Error types for language model operations

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API key not configured for provider '{0}'")]
    MissingApiKey(String),

    #[error("Unsupported language model provider: {0}")]
    UnsupportedProvider(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("No valid JSON found in model response: {0}")]
    NoJson(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(String),
}

impl From<LlmError> for barkeep_core::Error {
    fn from(err: LlmError) -> Self {
        barkeep_core::Error::language_model(err.to_string())
    }
}
