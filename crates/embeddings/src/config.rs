//! Configuration for embedding generation

use serde::{Deserialize, Serialize};

/// Embedding provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EmbeddingProviderType {
    /// OpenAI or any OpenAI-compatible API
    #[default]
    OpenAi,
    /// Mock provider for testing
    Mock,
}

/// Configuration for embedding generation
#[derive(Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub(crate) provider: EmbeddingProviderType,
    pub(crate) model: String,
    pub(crate) api_base_url: Option<String>,
    pub(crate) api_key: Option<String>,
    pub(crate) texts_per_api_request: usize,
    pub(crate) max_concurrent_api_requests: usize,
    pub(crate) retry_attempts: usize,
    /// Vector length produced by the mock provider
    pub(crate) mock_dimension: usize,
}

impl std::fmt::Debug for EmbeddingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field(
                "api_key",
                &self.api_key.as_ref().map(|_| "***REDACTED***"),
            )
            .field("texts_per_api_request", &self.texts_per_api_request)
            .field(
                "max_concurrent_api_requests",
                &self.max_concurrent_api_requests,
            )
            .field("retry_attempts", &self.retry_attempts)
            .field("mock_dimension", &self.mock_dimension)
            .finish()
    }
}

impl EmbeddingConfig {
    pub fn provider(&self) -> EmbeddingProviderType {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.texts_per_api_request == 0 {
            return Err("texts_per_api_request must be greater than 0".to_string());
        }
        if self.texts_per_api_request > 2048 {
            return Err("texts_per_api_request too large (max 2048)".to_string());
        }
        if self.max_concurrent_api_requests == 0 {
            return Err("max_concurrent_api_requests must be greater than 0".to_string());
        }
        if self.model.is_empty() {
            return Err("Model name cannot be empty".to_string());
        }
        if self.provider == EmbeddingProviderType::Mock && self.mock_dimension == 0 {
            return Err("mock_dimension must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderType::default(),
            model: "text-embedding-3-small".to_string(),
            api_base_url: None,
            api_key: None,
            texts_per_api_request: 64,
            max_concurrent_api_requests: 4,
            retry_attempts: 3,
            mock_dimension: 8,
        }
    }
}

/// Builder for EmbeddingConfig
#[derive(Default)]
pub struct EmbeddingConfigBuilder {
    config: EmbeddingConfig,
}

impl EmbeddingConfigBuilder {
    /// Create a new builder starting from defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the provider type
    pub fn provider(mut self, provider: EmbeddingProviderType) -> Self {
        self.config.provider = provider;
        self
    }

    /// Set the model name
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the API base URL
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = Some(url.into());
        self
    }

    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Set the number of texts per API request
    pub fn texts_per_api_request(mut self, size: usize) -> Self {
        self.config.texts_per_api_request = size;
        self
    }

    /// Set the maximum number of concurrent API requests
    pub fn max_concurrent_api_requests(mut self, max: usize) -> Self {
        self.config.max_concurrent_api_requests = max;
        self
    }

    /// Set the number of retries for failed requests
    pub fn retry_attempts(mut self, attempts: usize) -> Self {
        self.config.retry_attempts = attempts;
        self
    }

    /// Set the vector length of the mock provider
    pub fn mock_dimension(mut self, dimension: usize) -> Self {
        self.config.mock_dimension = dimension;
        self
    }

    /// Build the configuration
    pub fn build(self) -> EmbeddingConfig {
        self.config
    }
}
