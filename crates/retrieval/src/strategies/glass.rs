//! Glass-first progressive matching
//!
//! Narrows the graph to one glass type, then relaxes the ingredient filter
//! one ingredient at a time until enough cocktails surface. Stricter levels
//! always rank ahead of looser ones.

use super::common::StrategyContext;
use crate::keywords::{GlassKeywords, KeywordSet};
use crate::similarity::rank_by_similarity;
use crate::strategy::{RetrievalOutput, RetrievalRequest, RetrievalStrategy};
use async_trait::async_trait;
use barkeep_core::error::Result;
use barkeep_core::{ScoredName, StrategyId};
use barkeep_storage::{NodeLabel, Relationship};
use std::collections::HashSet;
use tracing::{debug, info};

/// Cocktails surfaced at one relaxation level
#[derive(Debug)]
struct LevelBlock {
    /// 0 is the strictest level, requiring every matched ingredient
    level: usize,
    names: Vec<String>,
}

pub struct GlassProgressiveStrategy {
    ctx: StrategyContext,
}

impl GlassProgressiveStrategy {
    pub fn new(ctx: StrategyContext) -> Self {
        Self { ctx }
    }

    /// Explicit glass keyword first, then the glass of a named cocktail
    async fn resolve_glass(&self, keywords: &GlassKeywords) -> Result<Option<String>> {
        if let Some(glass) = self
            .ctx
            .match_names(NodeLabel::GlassType, &keywords.glass_types)
            .await?
            .into_iter()
            .next()
        {
            debug!("Glass resolved from keyword: {glass}");
            return Ok(Some(glass));
        }

        for cocktail in &keywords.cocktails {
            let Some(resolved) = self.resolve_cocktail(cocktail).await? else {
                continue;
            };
            if let Some(glass) = self
                .ctx
                .store
                .related_names(&resolved, Relationship::HasGlassType)
                .await?
                .into_iter()
                .next()
            {
                debug!("Glass resolved from '{resolved}': {glass}");
                return Ok(Some(glass));
            }
        }
        Ok(None)
    }

    async fn resolve_cocktail(&self, name: &str) -> Result<Option<String>> {
        if let Some(found) = self
            .ctx
            .store
            .find_cocktails_by_name_fragment(name, 1)
            .await?
            .into_iter()
            .next()
        {
            return Ok(Some(found));
        }

        let vector = self.ctx.embeddings.embed(name).await;
        Ok(self
            .ctx
            .nearest_by_name(NodeLabel::Cocktail, &vector, 1)
            .await?
            .into_iter()
            .find(|hit| hit.score > 0.0)
            .map(|hit| hit.name))
    }

    /// Drops the rightmost ingredient per level until enough cocktails surface
    async fn relax(
        &self,
        matched: &[String],
        glass_cocktails: &[String],
    ) -> Result<Vec<LevelBlock>> {
        let target = self.ctx.config.glass.target_candidates;
        let min_candidates = self.ctx.config.glass.min_candidates_threshold;
        let in_glass: HashSet<&str> = glass_cocktails.iter().map(String::as_str).collect();

        let mut emitted: HashSet<String> = HashSet::new();
        let mut blocks = Vec::new();

        for level in 0..=matched.len() {
            if emitted.len() >= target {
                break;
            }
            let current = &matched[..matched.len() - level];
            if current.is_empty() {
                break;
            }

            let names: Vec<String> = self
                .ctx
                .store
                .cocktails_with_all(Relationship::HasIngredient, current)
                .await?
                .into_iter()
                .filter(|name| in_glass.contains(name.as_str()))
                .filter(|name| !emitted.contains(name))
                .collect();

            debug!("Level {level} with {current:?}: {} new cocktails", names.len());
            emitted.extend(names.iter().cloned());
            let found = names.len();
            blocks.push(LevelBlock { level, names });

            if level == 0 && found > min_candidates {
                break;
            }
        }
        Ok(blocks)
    }

    /// Glass cocktails closest by name to the cocktail keywords, or the query
    async fn by_name_similarity(
        &self,
        query: &str,
        keywords: &GlassKeywords,
        glass_cocktails: &[String],
    ) -> Result<Vec<LevelBlock>> {
        let text = if keywords.cocktails.is_empty() {
            query.to_string()
        } else {
            keywords.cocktails.join(" ")
        };
        let vector = self.ctx.embeddings.embed(&text).await;

        let in_glass: HashSet<&str> = glass_cocktails.iter().map(String::as_str).collect();
        let nodes = self.ctx.store.name_embeddings(NodeLabel::Cocktail).await?;
        let names = rank_by_similarity(
            &vector,
            nodes
                .iter()
                .filter(|node| in_glass.contains(node.name.as_str()))
                .map(|node| (node.name.as_str(), Some(node.embedding.as_slice()))),
        )
        .into_iter()
        .take(self.ctx.config.glass.target_candidates)
        .map(|scored| scored.name)
        .collect();

        Ok(vec![LevelBlock { level: 0, names }])
    }

    async fn run(
        &self,
        query: &str,
        keywords: &GlassKeywords,
        breadth: usize,
    ) -> Result<RetrievalOutput> {
        let Some(glass) = self.resolve_glass(keywords).await? else {
            info!("No glass type could be resolved");
            return Ok(RetrievalOutput::empty(breadth));
        };

        let glass_cocktails = self
            .ctx
            .store
            .cocktails_related_to(Relationship::HasGlassType, &glass)
            .await?;
        let glass_cocktails = self
            .ctx
            .without_excluded(glass_cocktails, &keywords.exclude_ingredients)
            .await?;
        if glass_cocktails.is_empty() {
            info!("No cocktails served in {glass}");
            return Ok(RetrievalOutput::empty(breadth));
        }

        let blocks = if keywords.include_ingredients.is_empty() {
            self.by_name_similarity(query, keywords, &glass_cocktails)
                .await?
        } else {
            let matched = self
                .ctx
                .match_names(NodeLabel::Ingredient, &keywords.include_ingredients)
                .await?;
            if matched.is_empty() {
                let names = glass_cocktails
                    .iter()
                    .take(self.ctx.config.glass.target_candidates)
                    .cloned()
                    .collect();
                vec![LevelBlock { level: 0, names }]
            } else {
                self.relax(&matched, &glass_cocktails).await?
            }
        };

        let query_vector = self.ctx.embeddings.embed(query).await;
        let mut ranked: Vec<ScoredName> = Vec::new();
        for block in &blocks {
            debug!("Level {} contributes {:?}", block.level, block.names);
            ranked.extend(self.ctx.rank_by_description(&query_vector, &block.names).await?);
        }

        info!(
            "Glass matching in {glass}: {} cocktails over {} levels",
            ranked.len(),
            blocks.len()
        );
        self.ctx.cacheable_output(ranked, breadth).await
    }
}

#[async_trait]
impl RetrievalStrategy for GlassProgressiveStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::GlassProgressive
    }

    async fn retrieve(&self, request: &RetrievalRequest) -> Result<RetrievalOutput> {
        match &request.keywords {
            KeywordSet::Glass(keywords) if !request.keywords.is_empty() => {
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
