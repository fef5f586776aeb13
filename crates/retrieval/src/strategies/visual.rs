//! Visual-ingredient expansion
//!
//! Seeds from the description vector index, maps each colour or visual term
//! onto one ingredient of the seed set, and pulls in further cocktails that
//! use those ingredients.

use super::common::{dedup_preserving_order, StrategyContext};
use crate::keywords::{KeywordSet, VisualKeywords};
use crate::similarity::rank_by_similarity;
use crate::strategy::{RetrievalOutput, RetrievalRequest, RetrievalStrategy};
use async_trait::async_trait;
use barkeep_core::error::Result;
use barkeep_core::StrategyId;
use barkeep_storage::{NodeLabel, Relationship};
use std::collections::HashSet;
use tracing::{debug, info};

pub struct VisualIngredientStrategy {
    ctx: StrategyContext,
}

impl VisualIngredientStrategy {
    pub fn new(ctx: StrategyContext) -> Self {
        Self { ctx }
    }

    /// Cocktails from the vector index scoring at or above the similarity floor
    async fn initial_set(&self, query_vector: &[f32]) -> Result<Vec<String>> {
        let threshold = self.ctx.config.visual.similarity_threshold;
        let hits = self
            .ctx
            .store
            .vector_search(query_vector, self.ctx.config.initial_top_k)
            .await?;

        Ok(hits
            .into_iter()
            .filter(|hit| hit.score >= threshold)
            .map(|hit| hit.name)
            .collect())
    }

    /// One ingredient per visual term, drawn from the ingredients of `seeds`
    async fn winning_ingredients(
        &self,
        seeds: &[String],
        visual_terms: &[String],
    ) -> Result<Vec<String>> {
        let mut pool: Vec<String> = Vec::new();
        let mut seen = HashSet::new();
        for seed in seeds {
            for ingredient in self
                .ctx
                .store
                .related_names(seed, Relationship::HasIngredient)
                .await?
            {
                if seen.insert(ingredient.to_lowercase()) {
                    pool.push(ingredient);
                }
            }
        }
        if pool.is_empty() {
            return Ok(Vec::new());
        }

        let all = self.ctx.store.name_embeddings(NodeLabel::Ingredient).await?;
        // Keep first-seen pool order so ties go to the earliest ingredient
        let pool_embeddings: Vec<(&str, Option<&[f32]>)> = pool
            .iter()
            .map(|name| {
                let embedding = all
                    .iter()
                    .find(|node| node.name.eq_ignore_ascii_case(name))
                    .map(|node| node.embedding.as_slice());
                (name.as_str(), embedding)
            })
            .collect();

        let term_vectors = self.ctx.embeddings.embed_many(visual_terms).await;
        let mut winners = Vec::new();
        for (term, vector) in visual_terms.iter().zip(term_vectors) {
            if let Some(best) = rank_by_similarity(&vector, pool_embeddings.iter().copied())
                .into_iter()
                .next()
            {
                debug!("Visual term '{term}' -> '{}' ({:.3})", best.name, best.score);
                winners.push(best.name);
            }
        }
        Ok(dedup_preserving_order(winners))
    }

    /// Up to `expansion_per_ingredient` new cocktails per winning ingredient
    async fn expand(
        &self,
        query_vector: &[f32],
        ingredients: &[String],
        seeds: &[String],
    ) -> Result<Vec<String>> {
        let per_ingredient = self.ctx.config.visual.expansion_per_ingredient;
        let min_similarity = self.ctx.config.visual.expansion_min_similarity;
        let seed_set: HashSet<&str> = seeds.iter().map(String::as_str).collect();

        let mut expanded = Vec::new();
        for ingredient in ingredients {
            let users: Vec<String> = self
                .ctx
                .store
                .cocktails_related_to(Relationship::HasIngredient, ingredient)
                .await?
                .into_iter()
                .filter(|name| !seed_set.contains(name.as_str()))
                .collect();

            let kept: Vec<String> = self
                .ctx
                .rank_by_description(query_vector, &users)
                .await?
                .into_iter()
                .filter(|scored| scored.score > min_similarity)
                .take(per_ingredient)
                .map(|scored| scored.name)
                .collect();

            debug!("Ingredient '{ingredient}' expanded to {kept:?}");
            expanded.extend(kept);
        }
        Ok(expanded)
    }

    async fn run(
        &self,
        query: &str,
        keywords: &VisualKeywords,
        breadth: usize,
    ) -> Result<RetrievalOutput> {
        let query_vector = self.ctx.embeddings.embed(query).await;

        let seeds = self.initial_set(&query_vector).await?;
        if seeds.is_empty() {
            info!("No cocktails above the visual similarity floor");
            return Ok(RetrievalOutput::empty(breadth));
        }

        let mut merged = seeds.clone();
        if !keywords.visual_terms.is_empty() {
            let winners = self
                .winning_ingredients(&seeds, &keywords.visual_terms)
                .await?;
            merged.extend(self.expand(&query_vector, &winners, &seeds).await?);
        }

        let merged = dedup_preserving_order(merged);
        let merged = self
            .ctx
            .without_excluded(merged, &keywords.exclude_ingredients)
            .await?;

        let ranked = self.ctx.rank_by_description(&query_vector, &merged).await?;
        info!(
            "Visual expansion ranked {} cocktails from {} seeds",
            ranked.len(),
            seeds.len()
        );
        self.ctx.cacheable_output(ranked, breadth).await
    }
}

#[async_trait]
impl RetrievalStrategy for VisualIngredientStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::VisualIngredient
    }

    async fn retrieve(&self, request: &RetrievalRequest) -> Result<RetrievalOutput> {
        match &request.keywords {
            // The description search needs no keywords, so an empty set still runs
            KeywordSet::Visual(keywords) => {
                self.run(&request.query, keywords, request.breadth).await
            }
            _ => {
                self.ctx
                    .nearest_neighbour_fallback(&request.query, request.breadth)
                    .await
            }
        }
    }
}
