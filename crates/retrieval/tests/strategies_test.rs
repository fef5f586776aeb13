//! Strategy behaviour against the in-memory fixture bar

mod common;

use barkeep_core::{RetrievalConfig, StrategyId};
use barkeep_retrieval::{
    AlternativeKeywords, AlternativeStrategy, GlassKeywords, GlassProgressiveStrategy,
    KeywordSet, MultiHopKeywords, MultiHopStrategy, RetrievalRequest, RetrievalStrategy,
    StrategyRegistry, VisualIngredientStrategy, VisualKeywords,
};
use barkeep_storage::{CocktailFixture, InMemoryGraph, NodeLabel};
use common::{bar, context, context_with, has_duplicates, names, OLD_FASHIONED_GLASS};
use pretty_assertions::assert_eq;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

// ==== Nearest-neighbour fallback ====

#[tokio::test]
async fn test_keyword_strategies_fall_back_on_empty_keywords() {
    let registry = StrategyRegistry::with_defaults(context().await);

    for id in [
        StrategyId::GlassProgressive,
        StrategyId::MultiHop,
        StrategyId::Alternative,
    ] {
        let strategy = registry.get(id).expect("default strategy registered");
        let request = RetrievalRequest::new("surprise me", KeywordSet::empty(id), 3);

        let output = strategy.retrieve(&request).await.unwrap();

        assert!(output.cacheable, "{id} fallback should be cacheable");
        assert_eq!(names(&output.current_slice), vec!["Manhattan", "Rob Roy", "Negroni"]);
        assert!(output.current_slice.len() <= 3);
        assert!(!has_duplicates(&output.ranked_full_names()));
    }
}

#[tokio::test]
async fn test_fallback_is_capped_at_fallback_top_k() {
    let config = RetrievalConfig {
        fallback_top_k: 4,
        ..Default::default()
    };
    let strategy = MultiHopStrategy::new(context_with(bar(), config).await);
    let request = RetrievalRequest::new("surprise me", KeywordSet::empty(StrategyId::MultiHop), 3);

    let output = strategy.retrieve(&request).await.unwrap();

    assert_eq!(output.ranked_full_names().len(), 4);
    assert_eq!(output.current_slice.len(), 3);
}

#[tokio::test]
async fn test_graph_failure_is_an_error() {
    let strategy = MultiHopStrategy::new(
        context_with(InMemoryGraph::failing(), RetrievalConfig::default()).await,
    );
    let request = RetrievalRequest::new("surprise me", KeywordSet::empty(StrategyId::MultiHop), 3);

    assert!(strategy.retrieve(&request).await.is_err());
}

// ==== Visual-ingredient expansion ====

fn red_drink(exclude: &[&str]) -> RetrievalRequest {
    RetrievalRequest::new(
        "a bright red drink",
        KeywordSet::Visual(VisualKeywords {
            visual_terms: strings(&["red"]),
            exclude_ingredients: strings(exclude),
            ..Default::default()
        }),
        3,
    )
}

#[tokio::test]
async fn test_visual_expands_through_winning_ingredient() {
    let strategy = VisualIngredientStrategy::new(context().await);

    let output = strategy.retrieve(&red_drink(&[])).await.unwrap();

    // Boulevardier sits below the similarity floor and arrives through Campari
    assert_eq!(
        output.ranked_full_names(),
        strings(&["Margarita", "Garibaldi", "Whiskey Sour", "Negroni", "Boulevardier"])
    );
    assert_eq!(names(&output.current_slice), vec!["Margarita", "Garibaldi", "Whiskey Sour"]);
    assert!(output.cacheable);
    assert!(output.current_slice.iter().all(|c| c.score.is_some()));
}

#[tokio::test]
async fn test_visual_without_keywords_ranks_by_description() {
    let strategy = VisualIngredientStrategy::new(context().await);
    let request = RetrievalRequest::new(
        "a bright red drink",
        KeywordSet::empty(StrategyId::VisualIngredient),
        3,
    );

    let output = strategy.retrieve(&request).await.unwrap();

    // Description order, not the name-embedding fallback
    assert_eq!(
        output.ranked_full_names(),
        strings(&["Margarita", "Garibaldi", "Whiskey Sour", "Negroni"])
    );
    assert_eq!(names(&output.current_slice), vec!["Margarita", "Garibaldi", "Whiskey Sour"]);
}

#[tokio::test]
async fn test_visual_with_foreign_keywords_falls_back() {
    let strategy = VisualIngredientStrategy::new(context().await);
    let request = RetrievalRequest::new("surprise me", KeywordSet::empty(StrategyId::MultiHop), 3);

    let output = strategy.retrieve(&request).await.unwrap();

    assert_eq!(names(&output.current_slice), vec!["Manhattan", "Rob Roy", "Negroni"]);
}

#[tokio::test]
async fn test_visual_term_tie_goes_to_first_seen_ingredient() {
    // Both seed ingredients sit at the same distance from "orange"
    let graph = InMemoryGraph::new()
        .with_cocktail(
            CocktailFixture::new("Sunrise")
                .ingredients(["Zest Syrup"])
                .description_embedding(vec![1.0, 0.0, 0.0, 0.0]),
        )
        .with_cocktail(
            CocktailFixture::new("Sunset")
                .ingredients(["Apricot Brandy"])
                .description_embedding(vec![0.9, 0.1, 0.0, 0.0]),
        )
        .with_cocktail(
            CocktailFixture::new("Zest Fizz")
                .ingredients(["Zest Syrup", "Soda"])
                .description_embedding(vec![0.35, 0.9367, 0.0, 0.0]),
        )
        .with_cocktail(
            CocktailFixture::new("Apricot Fizz")
                .ingredients(["Apricot Brandy", "Soda"])
                .description_embedding(vec![0.35, 0.9367, 0.0, 0.0]),
        )
        .with_name_embedding(NodeLabel::Ingredient, "Zest Syrup", vec![0.0, 0.0, 1.0, 0.0])
        .with_name_embedding(NodeLabel::Ingredient, "Apricot Brandy", vec![0.0, 0.0, 1.0, 0.0]);
    let strategy =
        VisualIngredientStrategy::new(context_with(graph, RetrievalConfig::default()).await);
    let request = RetrievalRequest::new(
        "surprise me",
        KeywordSet::Visual(VisualKeywords {
            visual_terms: strings(&["orange"]),
            ..Default::default()
        }),
        3,
    );

    let output = strategy.retrieve(&request).await.unwrap();

    // Zest Syrup comes from the top seed, although it sorts after Apricot Brandy
    assert_eq!(
        output.ranked_full_names(),
        strings(&["Sunrise", "Sunset", "Zest Fizz"])
    );
}

#[tokio::test]
async fn test_visual_applies_exclusions() {
    let strategy = VisualIngredientStrategy::new(context().await);

    let output = strategy.retrieve(&red_drink(&["tequila"])).await.unwrap();

    assert!(!output.ranked_full_names().contains(&"Margarita".to_string()));
    assert_eq!(output.ranked_full_names()[0], "Garibaldi");
}

#[tokio::test]
async fn test_visual_without_seeds_is_empty() {
    let strategy = VisualIngredientStrategy::new(context().await);
    let request = RetrievalRequest::new(
        "a glowing drink",
        KeywordSet::Visual(VisualKeywords {
            visual_terms: strings(&["glowing"]),
            ..Default::default()
        }),
        3,
    );

    let output = strategy.retrieve(&request).await.unwrap();

    assert!(output.is_empty());
    assert!(output.ranked_full_names().is_empty());
}

// ==== Glass-first progressive matching ====

fn glass_request(keywords: GlassKeywords) -> RetrievalRequest {
    RetrievalRequest::new(
        "bourbon drinks in an old fashioned glass",
        KeywordSet::Glass(keywords),
        3,
    )
}

#[tokio::test]
async fn test_glass_levels_rank_strictest_first() {
    let strategy = GlassProgressiveStrategy::new(context().await);
    let request = glass_request(GlassKeywords {
        glass_types: strings(&["old fashioned glass"]),
        include_ingredients: strings(&["bourbon", "sugar", "lemon"]),
        ..Default::default()
    });

    let output = strategy.retrieve(&request).await.unwrap();

    // Boulevardier is closest to the query but only matches at the loosest level
    assert_eq!(
        output.ranked_full_names(),
        strings(&["Whiskey Sour", "Old Fashioned", "Boulevardier"])
    );
    assert!(!has_duplicates(&output.ranked_full_names()));
    assert!(output
        .current_slice
        .iter()
        .all(|c| c.glass_type.as_deref() == Some(OLD_FASHIONED_GLASS)));
}

#[tokio::test]
async fn test_glass_inferred_from_named_cocktail() {
    let strategy = GlassProgressiveStrategy::new(context().await);
    let request = glass_request(GlassKeywords {
        cocktails: strings(&["Whiskey Sour"]),
        ..Default::default()
    });

    let output = strategy.retrieve(&request).await.unwrap();

    assert_eq!(
        output.ranked_full_names(),
        strings(&["Boulevardier", "Old Fashioned", "Negroni", "Whiskey Sour", "White Russian"])
    );
    assert!(output
        .current_slice
        .iter()
        .all(|c| c.glass_type.as_deref() == Some(OLD_FASHIONED_GLASS)));
}

#[tokio::test]
async fn test_glass_selects_by_name_then_orders_by_description() {
    let config = RetrievalConfig {
        glass: barkeep_core::config::GlassConfig {
            target_candidates: 3,
            ..Default::default()
        },
        ..Default::default()
    };
    let strategy = GlassProgressiveStrategy::new(context_with(bar(), config).await);
    let request = glass_request(GlassKeywords {
        cocktails: strings(&["Whiskey Sour"]),
        ..Default::default()
    });

    let output = strategy.retrieve(&request).await.unwrap();

    // Negroni is closer to the query but far from "Whiskey Sour" by name
    assert_eq!(
        output.ranked_full_names(),
        strings(&["Boulevardier", "Old Fashioned", "Whiskey Sour"])
    );
}

#[tokio::test]
async fn test_glass_exclusion_drops_cocktails() {
    let strategy = GlassProgressiveStrategy::new(context().await);
    let request = glass_request(GlassKeywords {
        glass_types: strings(&["old fashioned glass"]),
        exclude_ingredients: strings(&["cream"]),
        ..Default::default()
    });

    let output = strategy.retrieve(&request).await.unwrap();

    assert_eq!(output.ranked_full_names().len(), 4);
    assert!(!output.ranked_full_names().contains(&"White Russian".to_string()));
}

#[tokio::test]
async fn test_glass_unresolved_is_empty() {
    let strategy = GlassProgressiveStrategy::new(context().await);
    let request = glass_request(GlassKeywords {
        glass_types: strings(&["tiki mug"]),
        ..Default::default()
    });

    let output = strategy.retrieve(&request).await.unwrap();

    assert!(output.is_empty());
}

// ==== Multi-hop ingredient expansion ====

#[tokio::test]
async fn test_multi_hop_keeps_named_cocktails_and_expands() {
    let strategy = MultiHopStrategy::new(context().await);
    let request = RetrievalRequest::new(
        "bourbon and vermouth, or a margarita",
        KeywordSet::MultiHop(MultiHopKeywords {
            ingredients: strings(&["Bourbon", "Sweet Vermouth"]),
            cocktail_names: strings(&["Margarita"]),
        }),
        3,
    );

    let output = strategy.retrieve(&request).await.unwrap();

    let ranked = &output.ranked_full_names();
    assert_eq!(ranked.len(), 9);
    assert!(!has_duplicates(ranked));
    // Named lookup survives the re-rank even with a zero query vector
    assert!(ranked.contains(&"Margarita".to_string()));
    // Reached only through shared Angostura Bitters, Sugar and Campari
    assert!(ranked.contains(&"Champagne Cocktail".to_string()));
    assert!(ranked.contains(&"Garibaldi".to_string()));
    assert!(!ranked.contains(&"White Russian".to_string()));
    assert_eq!(output.current_slice.len(), 3);
}

#[tokio::test]
async fn test_multi_hop_shares_ingredients_across_every_one_hop_cocktail() {
    let mut graph = InMemoryGraph::new();
    for name in ["A", "B", "C", "D", "E", "F", "G", "H"] {
        let mut cocktail =
            CocktailFixture::new(name).ingredients(["Gin".to_string(), format!("{name} Syrup")]);
        if matches!(name, "G" | "H") {
            cocktail = cocktail.ingredients(["Elderflower"]);
        }
        graph = graph.with_cocktail(cocktail);
    }
    let graph =
        graph.with_cocktail(CocktailFixture::new("Z").ingredients(["Elderflower", "Tonic"]));
    let strategy = MultiHopStrategy::new(context_with(graph, RetrievalConfig::default()).await);
    let request = RetrievalRequest::new(
        "gin and elderflower",
        KeywordSet::MultiHop(MultiHopKeywords {
            ingredients: strings(&["Gin"]),
            ..Default::default()
        }),
        3,
    );

    let output = strategy.retrieve(&request).await.unwrap();

    // G and H fall outside the first six 1-hop cocktails but still make
    // Elderflower shared, which reaches Z
    assert_eq!(
        output.ranked_full_names(),
        strings(&["A", "B", "C", "D", "E", "F", "G", "H", "Z"])
    );
}

#[tokio::test]
async fn test_multi_hop_named_only() {
    let strategy = MultiHopStrategy::new(context().await);
    let request = RetrievalRequest::new(
        "something like a whiskey sour",
        KeywordSet::MultiHop(MultiHopKeywords {
            cocktail_names: strings(&["whiskey"]),
            ..Default::default()
        }),
        3,
    );

    let output = strategy.retrieve(&request).await.unwrap();

    assert_eq!(output.ranked_full_names(), strings(&["Whiskey Sour"]));
}

// ==== Alternative search ====

fn alternative_request(target: Option<&str>, ingredients: &[&str]) -> RetrievalRequest {
    RetrievalRequest::new(
        "recipes similar to a manhattan",
        KeywordSet::Alternative(AlternativeKeywords {
            target_cocktail: target.map(String::from),
            ingredients: strings(ingredients),
        }),
        3,
    )
}

#[tokio::test]
async fn test_alternative_resolves_target_by_embedding() {
    let strategy = AlternativeStrategy::new(context().await);

    // "Manhatan" is no substring of any name; its embedding sits at 0.82 to Manhattan
    let output = strategy
        .retrieve(&alternative_request(Some("Manhatan"), &[]))
        .await
        .unwrap();

    assert_eq!(
        names(&output.current_slice),
        vec!["Manhattan", "Boulevardier", "Rob Roy", "Old Fashioned"]
    );
    assert!(output.current_slice[0].is_target);
    assert!(output.current_slice[1..].iter().all(|c| !c.is_target));
    assert!(!output.cacheable);
    assert!(output.ranked_full_names().is_empty());
}

#[tokio::test]
async fn test_alternative_target_from_ingredient_ratio() {
    let strategy = AlternativeStrategy::new(context().await);

    let output = strategy
        .retrieve(&alternative_request(
            None,
            &["Bourbon", "Sweet Vermouth", "Angostura Bitters"],
        ))
        .await
        .unwrap();

    assert_eq!(output.current_slice[0].name, "Manhattan");
    assert!(output.current_slice[0].is_target);
}

#[tokio::test]
async fn test_alternative_complexity_window() {
    let config = RetrievalConfig {
        alternative: barkeep_core::config::AlternativeConfig {
            complexity_tolerance: 0,
            ..Default::default()
        },
        ..Default::default()
    };
    let strategy = AlternativeStrategy::new(context_with(bar(), config).await);
    let mut request = alternative_request(Some("Manhattan"), &[]);
    request.breadth = 10;

    let output = strategy.retrieve(&request).await.unwrap();

    // Old Fashioned has four ingredients against the target's three
    assert_eq!(
        names(&output.current_slice),
        vec![
            "Manhattan",
            "Boulevardier",
            "Rob Roy",
            "Champagne Cocktail",
            "Negroni",
            "Whiskey Sour"
        ]
    );
}

#[tokio::test]
async fn test_alternative_without_target_falls_back() {
    let strategy = AlternativeStrategy::new(context().await);

    let output = strategy
        .retrieve(&alternative_request(Some("Zombie"), &["Rum"]))
        .await
        .unwrap();

    assert!(output.cacheable);
    assert!(output.current_slice.len() <= 3);
    assert!(output.current_slice.iter().all(|c| !c.is_target));
}
