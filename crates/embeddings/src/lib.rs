//! Text embeddings for cocktail retrieval
//!
//! Providers wrap a hosted embedding API; [`EmbeddingService`] sits in front
//! of a provider and turns every failure into a zero vector so retrieval can
//! always proceed.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use barkeep_core::error::{Result, ResultExt};
use std::sync::Arc;

mod api_provider;
pub mod config;
pub mod error;
mod mock_provider;
pub mod provider;
mod service;

pub use api_provider::create_api_provider;
pub use config::{EmbeddingConfig, EmbeddingConfigBuilder, EmbeddingProviderType};
pub use error::EmbeddingError;
pub use mock_provider::MockEmbeddingProvider;
pub use provider::EmbeddingProvider;
pub use service::{EmbeddingService, DIMENSION_PROBE_TEXT};

/// Helper function to parse provider type from string
fn parse_provider_type(
    provider: &str,
) -> std::result::Result<EmbeddingProviderType, EmbeddingError> {
    match provider.to_lowercase().as_str() {
        "openai" | "api" => Ok(EmbeddingProviderType::OpenAi),
        "mock" => Ok(EmbeddingProviderType::Mock),
        other => Err(EmbeddingError::UnsupportedProvider(other.to_string())),
    }
}

/// Resolves the API key: config first, then `EMBEDDING_API_KEY`, then `OPENAI_API_KEY`
fn resolve_api_key(configured: Option<&String>) -> Option<String> {
    configured
        .cloned()
        .or_else(|| std::env::var("EMBEDDING_API_KEY").ok())
        .or_else(|| std::env::var("OPENAI_API_KEY").ok())
}

/// Converts the application's embeddings section into an [`EmbeddingConfig`]
pub fn embedding_config_from_app_config(
    embeddings_config: &barkeep_core::config::EmbeddingsConfig,
) -> Result<EmbeddingConfig> {
    let mut config_builder = EmbeddingConfigBuilder::new()
        .provider(parse_provider_type(&embeddings_config.provider)?)
        .model(embeddings_config.model.clone())
        .texts_per_api_request(embeddings_config.texts_per_api_request)
        .max_concurrent_api_requests(embeddings_config.max_concurrent_api_requests)
        .retry_attempts(embeddings_config.retry_attempts)
        .mock_dimension(embeddings_config.mock_dimension);

    if let Some(ref api_base_url) = embeddings_config.api_base_url {
        config_builder = config_builder.api_base_url(api_base_url.clone());
    }

    if let Some(key) = resolve_api_key(embeddings_config.api_key.as_ref()) {
        config_builder = config_builder.api_key(key);
    }

    Ok(config_builder.build())
}

/// Builds a provider from configuration
pub fn create_provider(config: EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    match config.provider() {
        EmbeddingProviderType::OpenAi => Ok(Arc::from(create_api_provider(config)?)),
        EmbeddingProviderType::Mock => Ok(Arc::new(MockEmbeddingProvider::new(
            config.mock_dimension,
        ))),
    }
}

/// Create an embedding service from the application configuration
///
/// Probes the provider once to learn the vector dimension.
pub async fn create_embedding_service_from_app_config(
    embeddings_config: &barkeep_core::config::EmbeddingsConfig,
) -> Result<Arc<EmbeddingService>> {
    let config = embedding_config_from_app_config(embeddings_config)?;
    let provider = create_provider(config)?;

    let service = EmbeddingService::new(provider)
        .await
        .context("Failed to create embedding service")?;

    Ok(Arc::new(service))
}
