//! OpenAI-compatible API provider for embeddings

use crate::{config::EmbeddingConfig, error::EmbeddingError, provider::EmbeddingProvider};
use async_openai::types::{CreateEmbeddingRequest, EmbeddingInput};
use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use barkeep_core::error::Result;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// OpenAI-compatible API provider
pub struct OpenAiApiProvider {
    client: Client<OpenAIConfig>,
    model: String,
    batch_size: usize,
    max_concurrent: usize,
    concurrency_limiter: Arc<Semaphore>,
    retry_attempts: usize,
}

impl OpenAiApiProvider {
    /// Create a new API provider from configuration
    pub(crate) fn new(config: EmbeddingConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| EmbeddingError::ConfigError(format!("Invalid configuration: {e}")))?;

        info!("Initializing OpenAI-compatible embeddings");
        info!("  Model: {}", config.model);
        info!("  Batch size: {}", config.texts_per_api_request);
        info!(
            "  Max concurrent requests: {}",
            config.max_concurrent_api_requests
        );
        info!("  Retry attempts: {}", config.retry_attempts);

        let mut openai_config = OpenAIConfig::new();
        if let Some(ref base_url) = config.api_base_url {
            info!("  Base URL: {}", base_url);
            openai_config = openai_config.with_api_base(base_url);
        }
        if let Some(ref api_key) = config.api_key {
            openai_config = openai_config.with_api_key(api_key);
        }

        Ok(Self {
            client: Client::with_config(openai_config),
            model: config.model,
            batch_size: config.texts_per_api_request,
            max_concurrent: config.max_concurrent_api_requests,
            concurrency_limiter: Arc::new(Semaphore::new(config.max_concurrent_api_requests)),
            retry_attempts: config.retry_attempts,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiApiProvider {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Option<Vec<f32>>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_embeddings = vec![None; texts.len()];

        // Each batch entry is (original_index, text)
        let batches: Vec<Vec<(usize, String)>> = texts
            .into_iter()
            .enumerate()
            .collect::<Vec<_>>()
            .chunks(self.batch_size)
            .map(|chunk| chunk.to_vec())
            .collect();

        debug!("Embedding in {} batches", batches.len());

        let results = stream::iter(batches)
            .map(|batch| {
                let limiter = self.concurrency_limiter.clone();
                let client = self.client.clone();
                let model = self.model.clone();
                let retry_attempts = self.retry_attempts;

                async move {
                    let (indices, texts_to_embed): (Vec<usize>, Vec<String>) =
                        batch.into_iter().unzip();

                    let _permit = limiter.acquire_owned().await.map_err(|e| {
                        EmbeddingError::InferenceError(format!(
                            "Failed to acquire concurrency permit: {e}"
                        ))
                    })?;

                    let mut attempt = 0;

                    loop {
                        let request = CreateEmbeddingRequest {
                            model: model.clone(),
                            input: EmbeddingInput::StringArray(texts_to_embed.clone()),
                            encoding_format: None,
                            dimensions: None,
                            user: None,
                        };

                        match client.embeddings().create(request).await {
                            Ok(response) => {
                                let mut sorted_embeddings: Vec<(usize, Vec<f32>)> = response
                                    .data
                                    .into_iter()
                                    .map(|emb| (emb.index as usize, emb.embedding))
                                    .collect();
                                sorted_embeddings.sort_by_key(|(idx, _)| *idx);

                                let results: Vec<(usize, Vec<f32>)> = indices
                                    .into_iter()
                                    .zip(sorted_embeddings.into_iter().map(|(_, emb)| emb))
                                    .collect();

                                return Ok::<_, EmbeddingError>(results);
                            }
                            Err(e) if attempt < retry_attempts => {
                                attempt += 1;
                                // Exponential backoff: 1s, 2s, 4s, 8s (capped)
                                let backoff_secs = (2u64.pow(attempt as u32 - 1)).min(8);
                                let backoff = Duration::from_secs(backoff_secs);
                                warn!(
                                    "Embedding request failed: {e}. Retrying in {backoff:?} (attempt {attempt}/{retry_attempts})"
                                );
                                tokio::time::sleep(backoff).await;
                            }
                            Err(e) => {
                                return Err(EmbeddingError::InferenceError(format!(
                                    "API request failed after {retry_attempts} retries: {e}"
                                )));
                            }
                        }
                    }
                }
            })
            .buffer_unordered(self.max_concurrent)
            .collect::<Vec<_>>()
            .await;

        for result in results {
            let batch_results =
                result.map_err(|e: EmbeddingError| -> barkeep_core::error::Error { e.into() })?;
            for (orig_idx, embedding) in batch_results {
                if let Some(slot) = all_embeddings.get_mut(orig_idx) {
                    *slot = Some(embedding);
                }
            }
        }

        Ok(all_embeddings)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Create a new OpenAI-compatible API provider from configuration
pub fn create_api_provider(config: EmbeddingConfig) -> Result<Box<dyn EmbeddingProvider>> {
    let provider = OpenAiApiProvider::new(config)?;
    Ok(Box::new(provider))
}
