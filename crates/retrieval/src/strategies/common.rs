//! Graph and embedding helpers shared by the strategies

use crate::similarity::rank_by_similarity;
use crate::strategy::RetrievalOutput;
use barkeep_core::error::Result;
use barkeep_core::{Candidate, RetrievalConfig, ScoredName};
use barkeep_embeddings::EmbeddingService;
use barkeep_storage::{GraphStore, NodeLabel, Relationship};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Collaborators every strategy reads through
#[derive(Clone)]
pub struct StrategyContext {
    pub store: Arc<dyn GraphStore>,
    pub embeddings: Arc<EmbeddingService>,
    pub config: RetrievalConfig,
}

impl StrategyContext {
    pub fn new(
        store: Arc<dyn GraphStore>,
        embeddings: Arc<EmbeddingService>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            store,
            embeddings,
            config,
        }
    }

    /// Ranks cocktails by description-embedding similarity to `query_vector`
    ///
    /// Cocktails without a description embedding score 0.
    pub(crate) async fn rank_by_description(
        &self,
        query_vector: &[f32],
        names: &[String],
    ) -> Result<Vec<ScoredName>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let embeddings = self.store.description_embeddings(names).await?;
        Ok(rank_by_similarity(
            query_vector,
            names
                .iter()
                .map(|name| (name.as_str(), embeddings.get(name).map(Vec::as_slice))),
        ))
    }

    /// The `k` nodes of `label` whose name embedding is closest to `vector`
    pub(crate) async fn nearest_by_name(
        &self,
        label: NodeLabel,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredName>> {
        let nodes = self.store.name_embeddings(label).await?;
        let mut ranked = rank_by_similarity(
            vector,
            nodes
                .iter()
                .map(|node| (node.name.as_str(), Some(node.embedding.as_slice()))),
        );
        ranked.truncate(k);
        Ok(ranked)
    }

    /// Nearest cocktails by name embedding to the whole query
    pub(crate) async fn nearest_neighbour_fallback(
        &self,
        query: &str,
        breadth: usize,
    ) -> Result<RetrievalOutput> {
        debug!("Falling back to nearest-neighbour search over cocktail names");
        let query_vector = self.embeddings.embed(query).await;
        let ranked = self
            .nearest_by_name(
                NodeLabel::Cocktail,
                &query_vector,
                self.config.fallback_top_k,
            )
            .await?;
        self.cacheable_output(ranked, breadth).await
    }

    /// Output whose full ranking may be sliced by later rounds
    pub(crate) async fn cacheable_output(
        &self,
        ranked: Vec<ScoredName>,
        breadth: usize,
    ) -> Result<RetrievalOutput> {
        let prefix = &ranked[..breadth.min(ranked.len())];
        let current_slice = self.hydrate(prefix).await?;

        Ok(RetrievalOutput {
            ranking: ranked,
            current_slice,
            breadth,
            cacheable: true,
        })
    }

    pub(crate) async fn hydrate(&self, scored: &[ScoredName]) -> Result<Vec<Candidate>> {
        hydrate_scored(self.store.as_ref(), scored).await
    }

    /// Drops cocktails that contain any of `excluded` ingredients
    pub(crate) async fn without_excluded(
        &self,
        names: Vec<String>,
        excluded: &[String],
    ) -> Result<Vec<String>> {
        if excluded.is_empty() || names.is_empty() {
            return Ok(names);
        }

        let banned: HashSet<String> = self
            .store
            .cocktails_sharing(Relationship::HasIngredient, excluded, 1)
            .await?
            .into_iter()
            .map(|m| m.name)
            .collect();

        let before = names.len();
        let kept: Vec<String> = names.into_iter().filter(|n| !banned.contains(n)).collect();
        debug!(
            "Excluded {} cocktails containing {:?}",
            before - kept.len(),
            excluded
        );
        Ok(kept)
    }

    /// Resolves each keyword to its nearest node name
    ///
    /// Keywords whose best match scores 0 or less (no nodes, or a
    /// zero-vector embedding) are skipped.
    pub(crate) async fn match_names(
        &self,
        label: NodeLabel,
        keywords: &[String],
    ) -> Result<Vec<String>> {
        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        let nodes = self.store.name_embeddings(label).await?;
        let vectors = self.embeddings.embed_many(keywords).await;

        let mut matched = Vec::new();
        for (keyword, vector) in keywords.iter().zip(vectors) {
            let best = rank_by_similarity(
                &vector,
                nodes
                    .iter()
                    .map(|node| (node.name.as_str(), Some(node.embedding.as_slice()))),
            )
            .into_iter()
            .next()
            .filter(|best| best.score > 0.0);

            match best {
                Some(best) => {
                    debug!("'{keyword}' -> '{}' ({:.3})", best.name, best.score);
                    matched.push(best.name);
                }
                None => debug!("No {} matches '{keyword}'", label.as_str()),
            }
        }
        Ok(dedup_preserving_order(matched))
    }
}

/// Hydrates scored names, carrying each score onto its candidate
pub async fn hydrate_scored(
    store: &dyn GraphStore,
    scored: &[ScoredName],
) -> Result<Vec<Candidate>> {
    let names: Vec<String> = scored.iter().map(|s| s.name.clone()).collect();
    let scores: HashMap<&str, f32> = scored
        .iter()
        .map(|s| (s.name.as_str(), s.score))
        .collect();

    let mut candidates = store.cocktail_details(&names).await?;
    for candidate in &mut candidates {
        candidate.score = scores.get(candidate.name.as_str()).copied();
    }
    Ok(candidates)
}

/// Removes repeated names, keeping the first occurrence
pub(crate) fn dedup_preserving_order(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}
