//! Multi-hop ingredient expansion
//!
//! Walks seed ingredients to the cocktails using them, to the ingredients
//! those cocktails share, and on to new cocktails using the shared
//! ingredients. Explicitly named cocktails are looked up directly and always
//! survive into the final ranking.

use super::common::{dedup_preserving_order, StrategyContext};
use crate::keywords::{KeywordSet, MultiHopKeywords};
use crate::strategy::{RetrievalOutput, RetrievalRequest, RetrievalStrategy};
use async_trait::async_trait;
use barkeep_core::error::Result;
use barkeep_core::StrategyId;
use barkeep_storage::{NodeLabel, Relationship};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// A 3-hop cocktail with its composite strength
#[derive(Debug, Clone, PartialEq)]
struct Expansion {
    name: String,
    strength: usize,
    bonus: usize,
}

impl Expansion {
    fn total(&self) -> usize {
        self.strength + self.bonus
    }
}

pub struct MultiHopStrategy {
    ctx: StrategyContext,
}

impl MultiHopStrategy {
    pub fn new(ctx: StrategyContext) -> Self {
        Self { ctx }
    }

    /// Substring matches first, topped up from the name-embedding index
    async fn named_lookup(&self, names: &[String]) -> Result<Vec<String>> {
        let config = &self.ctx.config.multi_hop;
        let mut found = Vec::new();

        for name in names {
            let mut hits = self
                .ctx
                .store
                .find_cocktails_by_name_fragment(name, config.name_lookup_limit)
                .await?;

            if hits.len() < config.name_lookup_limit {
                let vector = self.ctx.embeddings.embed(name).await;
                let neighbours = self
                    .ctx
                    .nearest_by_name(NodeLabel::Cocktail, &vector, config.name_lookup_limit)
                    .await?;
                hits.extend(
                    neighbours
                        .into_iter()
                        .filter(|hit| hit.score > config.name_similarity_threshold)
                        .map(|hit| hit.name),
                );
            }

            debug!("Named lookup '{name}' -> {hits:?}");
            found.extend(hits);
        }

        let mut found = dedup_preserving_order(found);
        found.truncate(self.ctx.config.initial_top_k);
        Ok(found)
    }

    /// Every cocktail using at least `min_ingredient_match` seed ingredients
    async fn one_hop(&self, ingredients: &[String]) -> Result<Vec<String>> {
        let matches = self
            .ctx
            .store
            .cocktails_sharing(
                Relationship::HasIngredient,
                ingredients,
                self.ctx.config.multi_hop.min_ingredient_match,
            )
            .await?;

        Ok(matches.into_iter().map(|m| m.name).collect())
    }

    /// Non-seed ingredients used by at least `min_cocktail_usage` 1-hop cocktails
    ///
    /// Counts over the whole 1-hop set, not just the part that reaches the union.
    async fn two_hop(&self, one_hop: &[String], seeds: &[String]) -> Result<Vec<String>> {
        let seeds: HashSet<String> = seeds.iter().map(|s| s.to_lowercase()).collect();
        let mut usage: HashMap<String, usize> = HashMap::new();

        for cocktail in one_hop {
            let ingredients = self
                .ctx
                .store
                .related_names(cocktail, Relationship::HasIngredient)
                .await?;
            let distinct: HashSet<String> = ingredients.into_iter().collect();
            for ingredient in distinct {
                if !seeds.contains(&ingredient.to_lowercase()) {
                    *usage.entry(ingredient).or_default() += 1;
                }
            }
        }

        let min_usage = self.ctx.config.multi_hop.min_cocktail_usage;
        let mut shared: Vec<(String, usize)> = usage
            .into_iter()
            .filter(|(_, count)| *count >= min_usage)
            .collect();
        shared.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(shared.into_iter().map(|(name, _)| name).collect())
    }

    async fn three_hop(&self, shared: &[String], seeds: &[String]) -> Result<Vec<String>> {
        let strengths = self
            .ctx
            .store
            .cocktails_sharing(Relationship::HasIngredient, shared, 1)
            .await?;
        let bonuses: HashMap<String, usize> = self
            .ctx
            .store
            .cocktails_sharing(Relationship::HasIngredient, seeds, 1)
            .await?
            .into_iter()
            .map(|m| (m.name, m.matches))
            .collect();

        let mut expansions: Vec<Expansion> = strengths
            .into_iter()
            .map(|m| Expansion {
                bonus: bonuses.get(&m.name).copied().unwrap_or(0),
                strength: m.matches,
                name: m.name,
            })
            .collect();
        expansions.sort_by(|a, b| {
            b.total()
                .cmp(&a.total())
                .then_with(|| b.strength.cmp(&a.strength))
                .then_with(|| a.name.cmp(&b.name))
        });
        expansions.truncate(self.ctx.config.multi_hop.expansion_top_k);

        debug!("3-hop expansion: {expansions:?}");
        Ok(expansions.into_iter().map(|e| e.name).collect())
    }

    async fn run(
        &self,
        query: &str,
        keywords: &MultiHopKeywords,
        breadth: usize,
    ) -> Result<RetrievalOutput> {
        let named = self.named_lookup(&keywords.cocktail_names).await?;

        let mut one_hop = Vec::new();
        let mut three_hop = Vec::new();
        if !keywords.ingredients.is_empty() {
            one_hop = self.one_hop(&keywords.ingredients).await?;
            let shared = self.two_hop(&one_hop, &keywords.ingredients).await?;
            if !shared.is_empty() {
                three_hop = self.three_hop(&shared, &keywords.ingredients).await?;
            }
            one_hop.truncate(self.ctx.config.initial_top_k);
        }

        info!(
            "Multi-hop sources: {} named, {} 1-hop, {} 3-hop",
            named.len(),
            one_hop.len(),
            three_hop.len()
        );

        let union = dedup_preserving_order(named.into_iter().chain(one_hop).chain(three_hop));
        if union.is_empty() {
            return self.ctx.nearest_neighbour_fallback(query, breadth).await;
        }

        let query_vector = self.ctx.embeddings.embed(query).await;
        let ranked = self.ctx.rank_by_description(&query_vector, &union).await?;
        self.ctx.cacheable_output(ranked, breadth).await
    }
}

#[async_trait]
impl RetrievalStrategy for MultiHopStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::MultiHop
    }

    async fn retrieve(&self, request: &RetrievalRequest) -> Result<RetrievalOutput> {
        match &request.keywords {
            KeywordSet::MultiHop(keywords) if !request.keywords.is_empty() => {
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
