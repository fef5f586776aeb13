//! Behaviour of the in-memory graph that other crates' tests rely on

use barkeep_core::{Error, RecipeIngredient};
use barkeep_storage::{
    CocktailFixture, GraphStore, InMemoryGraph, MatchCount, NodeLabel, Relationship,
};
use pretty_assertions::assert_eq;

fn bar() -> InMemoryGraph {
    InMemoryGraph::new()
        .with_category("Shot")
        .with_cocktail(
            CocktailFixture::new("Mojito")
                .category("Cocktail")
                .glass("Highball glass")
                .ingredient("Light rum", "2 oz")
                .ingredient("Lime", "1")
                .ingredient("Mint", "6 leaves")
                .description_embedding(vec![1.0, 0.0]),
        )
        .with_cocktail(
            CocktailFixture::new("Daiquiri")
                .category("Ordinary Drink")
                .glass("Cocktail glass")
                .ingredients(["Light rum", "Lime", "Sugar"])
                .serialized(r#"["Light rum", "Lime juice", "Sugar"]"#, r#"["1.5 oz", "1 oz"]"#)
                .description_embedding(vec![0.0, 1.0]),
        )
        .with_cocktail(
            CocktailFixture::new("Rum Punch")
                .category("Punch / Party Drink")
                .ingredients(["Light rum", "Orange juice"])
                .serialized("not json", "[]"),
        )
}

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_category_names_sorted_and_merged() {
    let categories = bar().category_names().await.unwrap();
    assert_eq!(
        categories,
        names(&["Cocktail", "Ordinary Drink", "Punch / Party Drink", "Shot"])
    );
}

#[tokio::test]
async fn test_sharing_orders_by_matches_then_name() {
    let shared = bar()
        .cocktails_sharing(
            Relationship::HasIngredient,
            &names(&["light RUM", "lime"]),
            1,
        )
        .await
        .unwrap();
    assert_eq!(
        shared,
        vec![
            MatchCount { name: "Daiquiri".into(), matches: 2 },
            MatchCount { name: "Mojito".into(), matches: 2 },
            MatchCount { name: "Rum Punch".into(), matches: 1 },
        ]
    );
}

#[tokio::test]
async fn test_with_all_requires_every_target() {
    let graph = bar();
    let all = graph
        .cocktails_with_all(Relationship::HasIngredient, &names(&["Lime", "Mint"]))
        .await
        .unwrap();
    assert_eq!(all, names(&["Mojito"]));
    let none = graph
        .cocktails_with_all(Relationship::HasIngredient, &[])
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_details_keep_request_order_and_skip_unknown() {
    let details = bar()
        .cocktail_details(&names(&["Daiquiri", "Nope", "Mojito"]))
        .await
        .unwrap();
    let got: Vec<&str> = details.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(got, vec!["Daiquiri", "Mojito"]);
}

#[tokio::test]
async fn test_recipe_prefers_serialized_fields() {
    let details = bar().cocktail_details(&names(&["Daiquiri"])).await.unwrap();
    assert_eq!(
        details[0].recipe,
        vec![
            RecipeIngredient::new("Light rum", "1.5 oz"),
            RecipeIngredient::new("Lime juice", "1 oz"),
            RecipeIngredient::new("Sugar", "unknown"),
        ]
    );
    assert_eq!(details[0].ingredients, names(&["Light rum", "Lime", "Sugar"]));
}

#[tokio::test]
async fn test_malformed_serialized_fields_fall_back_to_edges() {
    let details = bar().cocktail_details(&names(&["Rum Punch"])).await.unwrap();
    assert_eq!(
        details[0].recipe,
        vec![
            RecipeIngredient::new("Light rum", "unknown"),
            RecipeIngredient::new("Orange juice", "unknown"),
        ]
    );
}

#[tokio::test]
async fn test_vector_search_uses_normalised_cosine() {
    let hits = bar().vector_search(&[1.0, 0.0], 5).await.unwrap();
    assert_eq!(hits[0].name, "Mojito");
    assert!((hits[0].score - 1.0).abs() < 1e-6);
    assert!((hits[1].score - 0.5).abs() < 1e-6);
    assert_eq!(hits.len(), 2);
}

#[tokio::test]
async fn test_name_fragment_prefers_short_names() {
    let graph = InMemoryGraph::new()
        .with_cocktail(CocktailFixture::new("Dry Manhattan"))
        .with_cocktail(CocktailFixture::new("Manhattan"))
        .with_cocktail(CocktailFixture::new("Perfect Manhattan"));
    let found = graph
        .find_cocktails_by_name_fragment("manhattan", 2)
        .await
        .unwrap();
    assert_eq!(found, names(&["Manhattan", "Dry Manhattan"]));
}

#[tokio::test]
async fn test_related_names_and_reverse_lookup() {
    let graph = bar();
    assert_eq!(
        graph
            .related_names("Mojito", Relationship::HasGlassType)
            .await
            .unwrap(),
        names(&["Highball glass"])
    );
    assert_eq!(
        graph
            .cocktails_related_to(Relationship::HasGlassType, "cocktail GLASS")
            .await
            .unwrap(),
        names(&["Daiquiri"])
    );
}

#[tokio::test]
async fn test_name_embeddings_by_label() {
    let graph = bar().with_name_embedding(NodeLabel::Ingredient, "Lime", vec![0.3, 0.4]);
    let ingredients = graph.name_embeddings(NodeLabel::Ingredient).await.unwrap();
    assert_eq!(ingredients.len(), 1);
    assert!(graph
        .name_embeddings(NodeLabel::GlassType)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_failing_graph_reports_storage_error() {
    let err = InMemoryGraph::failing()
        .category_names()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Storage(_)));
}
