//! Shared fixture bar for the strategy tests
//!
//! Embeddings are 4-dimensional. Description axes loosely read as
//! (spirit-forward, bright, creamy, unused); ingredient and glass name
//! vectors are one-hot so keyword matching is unambiguous.

#![allow(dead_code)]

use barkeep_core::RetrievalConfig;
use barkeep_embeddings::{EmbeddingService, MockEmbeddingProvider};
use barkeep_retrieval::StrategyContext;
use barkeep_storage::{CocktailFixture, InMemoryGraph, NodeLabel};
use std::sync::Arc;

pub const DIM: usize = 4;

pub const OLD_FASHIONED_GLASS: &str = "Old-fashioned glass";
pub const COCKTAIL_GLASS: &str = "Cocktail glass";

fn cocktail(
    name: &str,
    glass: &str,
    ingredients: &[&str],
    name_embedding: [f32; 4],
    description_embedding: [f32; 4],
) -> CocktailFixture {
    CocktailFixture::new(name)
        .category("Cocktail")
        .glass(glass)
        .alcoholic("Alcoholic")
        .description(format!("A {name} served in a {glass}"))
        .ingredients(ingredients.iter().copied())
        .name_embedding(name_embedding.to_vec())
        .description_embedding(description_embedding.to_vec())
}

/// Ten cocktails with ingredient, glass and embedding data
pub fn bar() -> InMemoryGraph {
    InMemoryGraph::new()
        .with_cocktail(cocktail(
            "Manhattan",
            COCKTAIL_GLASS,
            &["Bourbon", "Sweet Vermouth", "Angostura Bitters"],
            [0.82, 0.5724, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
        ))
        .with_cocktail(cocktail(
            "Rob Roy",
            COCKTAIL_GLASS,
            &["Scotch", "Sweet Vermouth", "Angostura Bitters"],
            [0.5, 0.0, 0.866, 0.0],
            [0.9, 0.1, 0.0, 0.0],
        ))
        .with_cocktail(cocktail(
            "Boulevardier",
            OLD_FASHIONED_GLASS,
            &["Bourbon", "Sweet Vermouth", "Campari"],
            [0.0, 1.0, 0.0, 0.0],
            [0.8, 0.3, 0.0, 0.0],
        ))
        .with_cocktail(cocktail(
            "Old Fashioned",
            OLD_FASHIONED_GLASS,
            &["Bourbon", "Angostura Bitters", "Sugar", "Water"],
            [0.0, 0.0, 1.0, 0.0],
            [0.7, 0.0, 0.3, 0.0],
        ))
        .with_cocktail(cocktail(
            "Whiskey Sour",
            OLD_FASHIONED_GLASS,
            &["Bourbon", "Lemon Juice", "Sugar"],
            [0.0, 0.6, 0.8, 0.0],
            [0.3, 0.9, 0.0, 0.0],
        ))
        .with_cocktail(cocktail(
            "Margarita",
            COCKTAIL_GLASS,
            &["Tequila", "Triple Sec", "Lime Juice"],
            [0.0, 0.0, 0.0, 1.0],
            [0.0, 1.0, 0.0, 0.0],
        ))
        .with_cocktail(cocktail(
            "White Russian",
            OLD_FASHIONED_GLASS,
            &["Vodka", "Coffee Liqueur", "Cream"],
            [0.0, 0.8, 0.0, 0.6],
            [0.0, 0.0, 1.0, 0.0],
        ))
        .with_cocktail(cocktail(
            "Negroni",
            OLD_FASHIONED_GLASS,
            &["Gin", "Sweet Vermouth", "Campari"],
            [0.3, 0.0, 0.0, 0.954],
            [0.6, 0.6, 0.0, 0.0],
        ))
        .with_cocktail(cocktail(
            "Champagne Cocktail",
            "Champagne flute",
            &["Champagne", "Sugar", "Angostura Bitters"],
            [0.0, 0.6, 0.0, 0.8],
            [0.2, 0.2, 0.9, 0.0],
        ))
        .with_cocktail(cocktail(
            "Garibaldi",
            "Highball glass",
            &["Campari", "Orange Juice"],
            [0.0, 0.0, 0.6, 0.8],
            [0.1, 0.9, 0.2, 0.0],
        ))
        .with_name_embedding(NodeLabel::Ingredient, "Bourbon", vec![1.0, 0.0, 0.0, 0.0])
        .with_name_embedding(NodeLabel::Ingredient, "Sugar", vec![0.0, 1.0, 0.0, 0.0])
        .with_name_embedding(NodeLabel::Ingredient, "Lemon Juice", vec![0.0, 0.0, 1.0, 0.0])
        .with_name_embedding(NodeLabel::Ingredient, "Campari", vec![0.0, 0.0, 0.0, 1.0])
        .with_name_embedding(NodeLabel::GlassType, COCKTAIL_GLASS, vec![1.0, 0.0, 0.0, 0.0])
        .with_name_embedding(NodeLabel::GlassType, OLD_FASHIONED_GLASS, vec![0.0, 1.0, 0.0, 0.0])
}

/// Embedding vectors for the query and keyword texts used across tests
pub fn provider() -> MockEmbeddingProvider {
    MockEmbeddingProvider::new(DIM)
        .with_vector("surprise me", vec![1.0, 0.0, 0.0, 0.0])
        .with_vector("Manhatan", vec![1.0, 0.0, 0.0, 0.0])
        .with_vector("a bright red drink", vec![0.0, 1.0, 0.0, 0.0])
        .with_vector("red", vec![0.0, 0.0, 0.0, 1.0])
        .with_vector("bourbon drinks in an old fashioned glass", vec![1.0, 0.0, 0.0, 0.0])
        .with_vector("old fashioned glass", vec![0.0, 1.0, 0.0, 0.0])
        .with_vector("bourbon", vec![1.0, 0.0, 0.0, 0.0])
        .with_vector("sugar", vec![0.0, 1.0, 0.0, 0.0])
        .with_vector("lemon", vec![0.0, 0.0, 1.0, 0.0])
        .with_vector("Whiskey Sour", vec![0.0, 0.6, 0.8, 0.0])
        .with_vector("orange", vec![0.0, 0.0, 1.0, 0.0])
}

pub async fn context_with(graph: InMemoryGraph, config: RetrievalConfig) -> StrategyContext {
    let embeddings = EmbeddingService::new(Arc::new(provider()))
        .await
        .expect("mock provider should probe");
    StrategyContext::new(Arc::new(graph), Arc::new(embeddings), config)
}

pub async fn context() -> StrategyContext {
    context_with(bar(), RetrievalConfig::default()).await
}

pub fn names(candidates: &[barkeep_core::Candidate]) -> Vec<&str> {
    candidates.iter().map(|c| c.name.as_str()).collect()
}

pub fn has_duplicates(names: &[String]) -> bool {
    let mut seen = std::collections::HashSet::new();
    names.iter().any(|n| !seen.insert(n))
}
