//! Relationship-and-complexity alternative search
//!
//! Resolves a single target cocktail and ranks the rest of the graph by how
//! many ingredients they share with it, keeping recipes of similar
//! complexity. The target always leads the result and does not count
//! against the breadth.

use super::common::StrategyContext;
use crate::keywords::{AlternativeKeywords, KeywordSet};
use crate::strategy::{RetrievalOutput, RetrievalRequest, RetrievalStrategy};
use async_trait::async_trait;
use barkeep_core::error::Result;
use barkeep_core::{ScoredName, StrategyId};
use barkeep_storage::{NodeLabel, Relationship};
use std::collections::HashSet;
use tracing::{debug, info};

/// A cocktail related to the target through shared ingredients
#[derive(Debug, Clone, PartialEq)]
struct RelatedCocktail {
    name: String,
    shared: usize,
    ingredient_count: usize,
}

pub struct AlternativeStrategy {
    ctx: StrategyContext,
}

impl AlternativeStrategy {
    pub fn new(ctx: StrategyContext) -> Self {
        Self { ctx }
    }

    /// Name lookup first, then the best ingredient-ratio match
    async fn resolve_target(&self, keywords: &AlternativeKeywords) -> Result<Option<String>> {
        if let Some(name) = &keywords.target_cocktail {
            if let Some(target) = self.target_from_name(name).await? {
                return Ok(Some(target));
            }
        }
        if keywords.ingredients.is_empty() {
            return Ok(None);
        }
        self.target_from_ingredients(&keywords.ingredients).await
    }

    async fn target_from_name(&self, name: &str) -> Result<Option<String>> {
        if let Some(found) = self
            .ctx
            .store
            .find_cocktails_by_name_fragment(name, 1)
            .await?
            .into_iter()
            .next()
        {
            debug!("Target '{name}' found by name: {found}");
            return Ok(Some(found));
        }

        let threshold = self.ctx.config.alternative.name_similarity_threshold;
        let vector = self.ctx.embeddings.embed(name).await;
        let nearest = self
            .ctx
            .nearest_by_name(NodeLabel::Cocktail, &vector, 1)
            .await?
            .into_iter()
            .next()
            .filter(|hit| hit.score > threshold);

        if let Some(hit) = &nearest {
            debug!("Target '{name}' resolved by embedding: {} ({:.3})", hit.name, hit.score);
        }
        Ok(nearest.map(|hit| hit.name))
    }

    /// Cocktail covering the largest share of its recipe with `ingredients`
    async fn target_from_ingredients(&self, ingredients: &[String]) -> Result<Option<String>> {
        let matches = self
            .ctx
            .store
            .cocktails_sharing(
                Relationship::HasIngredient,
                ingredients,
                self.ctx.config.alternative.min_target_ingredient_matches,
            )
            .await?;
        if matches.is_empty() {
            return Ok(None);
        }

        let names: Vec<String> = matches.iter().map(|m| m.name.clone()).collect();
        let counts = self.ctx.store.ingredient_counts(&names).await?;

        let ratio = |name: &str, matched: usize| {
            let total = counts.get(name).copied().unwrap_or(0).max(1);
            matched as f64 / total as f64
        };

        let best = matches.iter().max_by(|a, b| {
            ratio(&a.name, a.matches)
                .total_cmp(&ratio(&b.name, b.matches))
                .then_with(|| a.matches.cmp(&b.matches))
                .then_with(|| b.name.cmp(&a.name))
        });

        if let Some(best) = best {
            debug!(
                "Target from ingredients: {} ({} matches, ratio {:.2})",
                best.name,
                best.matches,
                ratio(&best.name, best.matches)
            );
        }
        Ok(best.map(|m| m.name.clone()))
    }

    /// Cocktails sharing ingredients with `target` within the complexity window
    async fn related(&self, target: &str) -> Result<Vec<RelatedCocktail>> {
        let config = &self.ctx.config.alternative;

        let target_ingredients: Vec<String> = self
            .ctx
            .store
            .related_names(target, Relationship::HasIngredient)
            .await?
            .into_iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        if target_ingredients.is_empty() {
            return Ok(Vec::new());
        }
        let target_count = target_ingredients.len();

        let sharing: Vec<_> = self
            .ctx
            .store
            .cocktails_sharing(
                Relationship::HasIngredient,
                &target_ingredients,
                config.min_shared_ingredients,
            )
            .await?
            .into_iter()
            .filter(|m| m.name != target)
            .collect();

        let names: Vec<String> = sharing.iter().map(|m| m.name.clone()).collect();
        let counts = self.ctx.store.ingredient_counts(&names).await?;

        let mut related: Vec<RelatedCocktail> = sharing
            .into_iter()
            .filter_map(|m| {
                let ingredient_count = counts.get(&m.name).copied()?;
                (ingredient_count.abs_diff(target_count) <= config.complexity_tolerance).then(
                    || RelatedCocktail {
                        name: m.name,
                        shared: m.matches,
                        ingredient_count,
                    },
                )
            })
            .collect();

        related.sort_by(|a, b| {
            b.shared
                .cmp(&a.shared)
                .then_with(|| a.ingredient_count.cmp(&b.ingredient_count))
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(related)
    }

    async fn run(
        &self,
        query: &str,
        keywords: &AlternativeKeywords,
        breadth: usize,
    ) -> Result<RetrievalOutput> {
        let Some(target) = self.resolve_target(keywords).await? else {
            info!("No target cocktail resolved");
            return self.ctx.nearest_neighbour_fallback(query, breadth).await;
        };

        let related = self.related(&target).await?;
        info!(
            "Found {} alternatives to {target}, returning {}",
            related.len(),
            breadth.min(related.len())
        );

        let Some(mut target_candidate) = self
            .ctx
            .store
            .cocktail_details(std::slice::from_ref(&target))
            .await?
            .into_iter()
            .next()
        else {
            return Ok(RetrievalOutput {
                cacheable: false,
                ..RetrievalOutput::empty(breadth)
            });
        };
        target_candidate.is_target = true;

        let top: Vec<ScoredName> = related
            .into_iter()
            .take(breadth)
            .map(|r| ScoredName::new(r.name, r.shared as f32))
            .collect();

        let mut current_slice = vec![target_candidate];
        current_slice.extend(self.ctx.hydrate(&top).await?);

        Ok(RetrievalOutput {
            ranking: Vec::new(),
            current_slice,
            breadth,
            cacheable: false,
        })
    }
}

#[async_trait]
impl RetrievalStrategy for AlternativeStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::Alternative
    }

    async fn retrieve(&self, request: &RetrievalRequest) -> Result<RetrievalOutput> {
        match &request.keywords {
            KeywordSet::Alternative(keywords) if !request.keywords.is_empty() => {
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
