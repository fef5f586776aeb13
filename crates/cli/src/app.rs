//! Builds the collaborators of one process from configuration

use anyhow::Context;
use barkeep_core::config::Config;
use barkeep_embeddings::create_embedding_service_from_app_config;
use barkeep_llm::{create_llm_services, TaskClassifier};
use barkeep_refinement::RefinementLoop;
use barkeep_retrieval::{KeywordResolver, StrategyContext, StrategyRegistry};
use barkeep_storage::{create_graph_store, GraphStore};
use std::sync::Arc;
use tracing::{debug, info};

/// Everything the commands need, connected once
pub struct App {
    pub store: Arc<dyn GraphStore>,
    pub resolver: Arc<KeywordResolver>,
    pub classifier: Arc<dyn TaskClassifier>,
    pub refinement: RefinementLoop,
}

impl App {
    /// Connects the graph, embedding and model backends named in `config`
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        info!("Connecting to graph at {}", config.storage.bolt_uri());
        let store = create_graph_store(&config.storage)
            .await
            .context("Failed to connect to the cocktail graph")?;

        let embeddings = create_embedding_service_from_app_config(&config.embeddings)
            .await
            .context("Failed to create embedding service")?;
        debug!("Embedding dimension: {}", embeddings.dimension());

        let llm = create_llm_services(&config.llm).context("Failed to create model clients")?;

        let ctx = StrategyContext::new(store.clone(), embeddings, config.retrieval.clone());
        let registry = StrategyRegistry::with_defaults(ctx);
        let resolver = Arc::new(KeywordResolver::new(llm.extraction, store.clone()));

        let refinement = RefinementLoop::new(
            registry,
            resolver.clone(),
            llm.classifier.clone(),
            llm.scoring,
            store.clone(),
            config.refinement.clone(),
        )
        .with_image_describer(llm.image_describer);

        Ok(Self {
            store,
            resolver,
            classifier: llm.classifier,
            refinement,
        })
    }
}
