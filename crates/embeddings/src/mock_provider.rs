//! Mock embedding provider for testing

use crate::error::EmbeddingError;
use crate::provider::EmbeddingProvider;
use async_trait::async_trait;
use barkeep_core::error::Result;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock embedding provider backed by a lookup table
///
/// Texts found in the table return their stored vector; any other text
/// returns zeros of the configured dimension.
pub struct MockEmbeddingProvider {
    embedding_dim: usize,
    vectors: HashMap<String, Vec<f32>>,
    failing_texts: HashSet<String>,
    fail_everything: bool,
    calls: AtomicUsize,
}

impl MockEmbeddingProvider {
    /// Create a new mock provider with specified embedding dimension
    pub fn new(embedding_dim: usize) -> Self {
        Self {
            embedding_dim,
            vectors: HashMap::new(),
            failing_texts: HashSet::new(),
            fail_everything: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// A provider whose every request fails
    pub fn unavailable() -> Self {
        Self {
            fail_everything: true,
            ..Self::new(0)
        }
    }

    /// Registers the vector returned for `text`
    pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.into(), vector);
        self
    }

    /// Any request containing `text` fails
    pub fn failing_on(mut self, text: impl Into<String>) -> Self {
        self.failing_texts.insert(text.into());
        self
    }

    /// Number of `embed` calls served so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Option<Vec<f32>>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_everything || texts.iter().any(|t| self.failing_texts.contains(t)) {
            return Err(EmbeddingError::InferenceError("mock provider failure".to_string()).into());
        }

        Ok(texts
            .into_iter()
            .map(|text| {
                Some(
                    self.vectors
                        .get(&text)
                        .cloned()
                        .unwrap_or_else(|| vec![0.0; self.embedding_dim]),
                )
            })
            .collect())
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
