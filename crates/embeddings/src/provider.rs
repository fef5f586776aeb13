//! Trait definition for embedding providers

use async_trait::async_trait;
use barkeep_core::error::Result;

/// Trait for embedding providers
///
/// Providers are thin adapters over a hosted embedding service. Fallback
/// behaviour lives in [`crate::EmbeddingService`], not here.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embeddings for a list of texts
    ///
    /// # Returns
    /// One entry per input text, in input order. `None` marks a text the
    /// service declined to embed.
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Option<Vec<f32>>>>;

    /// Model identifier, for logging
    fn model_name(&self) -> &str;
}
