//! Fault-tolerant embedding front end used by the retrieval strategies

use crate::error::EmbeddingError;
use crate::provider::EmbeddingProvider;
use barkeep_core::error::Result;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Text embedded once at start-up to learn the vector dimension
pub const DIMENSION_PROBE_TEXT: &str = "dimension probe";

/// Embeds text with a zero-vector fallback
///
/// The vector dimension is probed once at construction. After that,
/// [`EmbeddingService::embed`] never fails: any provider error or malformed
/// vector yields a zero vector of the probed dimension, which scores 0
/// against everything. Successful embeddings are memoised per text.
pub struct EmbeddingService {
    provider: Arc<dyn EmbeddingProvider>,
    dimension: usize,
    cache: DashMap<String, Vec<f32>>,
}

impl EmbeddingService {
    /// Probes the provider and builds the service
    ///
    /// # Errors
    /// Returns an error if the probe fails or yields an empty vector
    pub async fn new(provider: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let probe = provider
            .embed(vec![DIMENSION_PROBE_TEXT.to_string()])
            .await
            .map_err(|e| EmbeddingError::ProbeFailed(e.to_string()))?;

        let dimension = probe
            .into_iter()
            .next()
            .flatten()
            .map(|v| v.len())
            .filter(|len| *len > 0)
            .ok_or_else(|| EmbeddingError::ProbeFailed("provider returned no vector".into()))?;

        info!(
            "Embedding service ready (model: {}, dimension: {dimension})",
            provider.model_name()
        );

        Ok(Self {
            provider,
            dimension,
            cache: DashMap::new(),
        })
    }

    /// Dimension learned from the probe
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Zero vector of the probed dimension
    pub fn zero_vector(&self) -> Vec<f32> {
        vec![0.0; self.dimension]
    }

    /// Embeds one text, falling back to a zero vector
    pub async fn embed(&self, text: &str) -> Vec<f32> {
        let mut vectors = self.embed_many(&[text.to_string()]).await;
        vectors.pop().unwrap_or_else(|| self.zero_vector())
    }

    /// Embeds several texts in one provider call, preserving input order
    ///
    /// Texts that fail individually, or all texts when the call fails,
    /// receive zero vectors.
    pub async fn embed_many(&self, texts: &[String]) -> Vec<Vec<f32>> {
        let mut seen = HashSet::new();
        let pending: Vec<String> = texts
            .iter()
            .filter(|t| !t.trim().is_empty())
            .filter(|t| !self.cache.contains_key(t.as_str()))
            .filter(|t| seen.insert(t.as_str()))
            .cloned()
            .collect();

        if !pending.is_empty() {
            debug!("Embedding {} uncached texts", pending.len());
            match self.provider.embed(pending.clone()).await {
                Ok(vectors) => {
                    for (text, vector) in pending.into_iter().zip(vectors) {
                        match vector {
                            Some(v) if v.len() == self.dimension => {
                                self.cache.insert(text, v);
                            }
                            Some(v) => warn!(
                                "{}",
                                EmbeddingError::DimensionMismatch {
                                    expected: self.dimension,
                                    actual: v.len(),
                                }
                            ),
                            None => warn!("Provider returned no embedding for '{text}'"),
                        }
                    }
                }
                Err(e) => warn!("Embedding failed, using zero vectors: {e}"),
            }
        }

        texts
            .iter()
            .map(|t| {
                self.cache
                    .get(t.as_str())
                    .map(|v| v.value().clone())
                    .unwrap_or_else(|| self.zero_vector())
            })
            .collect()
    }

    /// Number of memoised texts
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}
