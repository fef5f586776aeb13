//! Graph retrieval strategies for cocktail queries
//!
//! A query is answered by one of four [`RetrievalStrategy`] implementations,
//! selected by [`StrategyId`](barkeep_core::StrategyId):
//!
//! - [`VisualIngredientStrategy`] - description-vector seeds expanded through
//!   ingredients that match colour terms
//! - [`GlassProgressiveStrategy`] - one glass type, ingredient filters relaxed
//!   level by level
//! - [`MultiHopStrategy`] - ingredient to cocktail to shared ingredient to
//!   new cocktail
//! - [`AlternativeStrategy`] - cocktails sharing ingredients with one target
//!
//! [`KeywordResolver`] turns free text into the typed [`KeywordSet`] each
//! strategy reads, and [`StrategyRegistry`] holds one instance per id.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod keywords;
mod registry;
pub mod similarity;
mod strategies;
mod strategy;

pub use keywords::{
    AlternativeKeywords, GlassKeywords, KeywordParseError, KeywordResolver, KeywordSet,
    MultiHopKeywords, VisualKeywords, DEFAULT_CATEGORIES,
};
pub use registry::StrategyRegistry;
pub use similarity::{cosine_similarity, rank_by_similarity, sort_scores_descending};
pub use strategies::{
    hydrate_scored, AlternativeStrategy, GlassProgressiveStrategy, MultiHopStrategy,
    StrategyContext, VisualIngredientStrategy,
};
pub use strategy::{RetrievalOutput, RetrievalRequest, RetrievalStrategy};
