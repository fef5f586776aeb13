//! Typed keyword sets and their resolution from free text

use barkeep_core::StrategyId;
use barkeep_llm::ExtractionService;
use barkeep_storage::GraphStore;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Categories offered to the extraction prompt when the graph cannot list them
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Coffee / Tea",
    "Cocoa",
    "Milk / Float / Shake",
    "Soft Drink",
    "Shot",
    "Cocktail",
    "Shake",
    "Other / Unknown",
    "Punch / Party Drink",
    "Homemade Liqueur",
    "Ordinary Drink",
    "Beer",
];

/// Keywords for visual-ingredient expansion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualKeywords {
    pub cocktails: Vec<String>,
    pub include_ingredients: Vec<String>,
    pub exclude_ingredients: Vec<String>,
    pub glass_types: Vec<String>,
    pub categories: Vec<String>,
    /// Color terms only
    pub visual_terms: Vec<String>,
}

/// Keywords for glass-first progressive matching
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlassKeywords {
    pub cocktails: Vec<String>,
    pub include_ingredients: Vec<String>,
    pub exclude_ingredients: Vec<String>,
    pub glass_types: Vec<String>,
    pub categories: Vec<String>,
}

/// Keywords for multi-hop ingredient expansion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiHopKeywords {
    pub ingredients: Vec<String>,
    pub cocktail_names: Vec<String>,
}

/// Keywords for relationship-and-complexity alternative search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeKeywords {
    pub target_cocktail: Option<String>,
    pub ingredients: Vec<String>,
}

/// What the extraction step found in a query, shaped per strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KeywordSet {
    Visual(VisualKeywords),
    Glass(GlassKeywords),
    MultiHop(MultiHopKeywords),
    Alternative(AlternativeKeywords),
}

/// Why an extraction document could not be read
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeywordParseError {
    #[error("extraction result is not a JSON object")]
    NotAnObject,

    #[error("field '{field}' is invalid: {reason}")]
    InvalidField { field: String, reason: String },
}

impl KeywordSet {
    /// The all-empty keyword set of a strategy
    pub fn empty(strategy: StrategyId) -> Self {
        match strategy {
            StrategyId::VisualIngredient => Self::Visual(VisualKeywords::default()),
            StrategyId::GlassProgressive => Self::Glass(GlassKeywords::default()),
            StrategyId::MultiHop => Self::MultiHop(MultiHopKeywords::default()),
            StrategyId::Alternative => Self::Alternative(AlternativeKeywords::default()),
        }
    }

    pub fn strategy(&self) -> StrategyId {
        match self {
            Self::Visual(_) => StrategyId::VisualIngredient,
            Self::Glass(_) => StrategyId::GlassProgressive,
            Self::MultiHop(_) => StrategyId::MultiHop,
            Self::Alternative(_) => StrategyId::Alternative,
        }
    }

    /// True when no field carries a keyword
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Visual(k) => {
                k.cocktails.is_empty()
                    && k.include_ingredients.is_empty()
                    && k.exclude_ingredients.is_empty()
                    && k.glass_types.is_empty()
                    && k.categories.is_empty()
                    && k.visual_terms.is_empty()
            }
            Self::Glass(k) => {
                k.cocktails.is_empty()
                    && k.include_ingredients.is_empty()
                    && k.exclude_ingredients.is_empty()
                    && k.glass_types.is_empty()
                    && k.categories.is_empty()
            }
            Self::MultiHop(k) => k.ingredients.is_empty() && k.cocktail_names.is_empty(),
            Self::Alternative(k) => k.target_cocktail.is_none() && k.ingredients.is_empty(),
        }
    }

    /// Validates an extraction document against the strategy's schema
    ///
    /// `null` and absent fields read as empty, a bare string reads as a
    /// one-element list, and values are trimmed and de-duplicated
    /// case-insensitively.
    pub fn parse(strategy: StrategyId, value: &Value) -> Result<Self, KeywordParseError> {
        let object = value.as_object().ok_or(KeywordParseError::NotAnObject)?;

        Ok(match strategy {
            StrategyId::VisualIngredient => Self::Visual(VisualKeywords {
                cocktails: string_list(object, &["cocktail", "cocktails"])?,
                include_ingredients: string_list(object, &["include_ingredients", "ingredient"])?,
                exclude_ingredients: string_list(object, &["exclude_ingredients"])?,
                glass_types: string_list(object, &["glassType", "glass_type"])?,
                categories: string_list(object, &["category"])?,
                visual_terms: string_list(object, &["visual_keywords"])?,
            }),
            StrategyId::GlassProgressive => Self::Glass(GlassKeywords {
                cocktails: string_list(object, &["cocktail", "cocktails"])?,
                include_ingredients: string_list(object, &["include_ingredients", "ingredient"])?,
                exclude_ingredients: string_list(object, &["exclude_ingredients"])?,
                glass_types: string_list(object, &["glassType", "glass_type"])?,
                categories: string_list(object, &["category"])?,
            }),
            StrategyId::MultiHop => Self::MultiHop(MultiHopKeywords {
                ingredients: string_list(object, &["ingredients"])?,
                cocktail_names: string_list(object, &["cocktail_names", "cocktail"])?,
            }),
            StrategyId::Alternative => Self::Alternative(AlternativeKeywords {
                target_cocktail: string_list(object, &["target_cocktail"])?
                    .into_iter()
                    .next(),
                ingredients: string_list(object, &["ingredients"])?,
            }),
        })
    }
}

/// Reads the first present, non-null field among `aliases` as a string list
fn string_list(
    object: &Map<String, Value>,
    aliases: &[&str],
) -> Result<Vec<String>, KeywordParseError> {
    let Some((field, value)) = aliases
        .iter()
        .find_map(|alias| object.get(*alias).filter(|v| !v.is_null()).map(|v| (*alias, v)))
    else {
        return Ok(Vec::new());
    };

    let invalid = |reason: &str| KeywordParseError::InvalidField {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    let raw: Vec<&str> = match value {
        Value::String(s) => vec![s.as_str()],
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().ok_or_else(|| invalid("list entries must be strings")))
            .collect::<Result<_, _>>()?,
        _ => return Err(invalid("expected a string or a list of strings")),
    };

    let mut seen = HashSet::new();
    Ok(raw
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .map(str::to_string)
        .collect())
}

/// Turns query text into a [`KeywordSet`] through the extraction service
///
/// Never fails: any extraction or validation problem yields the strategy's
/// empty keyword set. Graph categories are read once and memoised.
pub struct KeywordResolver {
    extraction: Arc<dyn ExtractionService>,
    store: Arc<dyn GraphStore>,
    categories: OnceCell<Vec<String>>,
}

impl KeywordResolver {
    pub fn new(extraction: Arc<dyn ExtractionService>, store: Arc<dyn GraphStore>) -> Self {
        Self {
            extraction,
            store,
            categories: OnceCell::new(),
        }
    }

    /// Category names offered to the extraction prompt
    pub async fn categories(&self) -> Vec<String> {
        let loaded = self
            .categories
            .get_or_try_init(|| async { self.store.category_names().await })
            .await;

        match loaded {
            Ok(names) if !names.is_empty() => names.clone(),
            Ok(_) => default_categories(),
            Err(e) => {
                warn!("Failed to load categories, using defaults: {e}");
                default_categories()
            }
        }
    }

    pub async fn resolve(&self, strategy: StrategyId, query: &str) -> KeywordSet {
        let categories = self.categories().await;

        let value = match self.extraction.extract(strategy, query, &categories).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Keyword extraction failed for {strategy}, using empty keywords: {e}");
                return KeywordSet::empty(strategy);
            }
        };

        match KeywordSet::parse(strategy, &value) {
            Ok(keywords) => {
                debug!("Resolved keywords: {keywords:?}");
                keywords
            }
            Err(e) => {
                warn!("Keyword document rejected for {strategy}, using empty keywords: {e}");
                KeywordSet::empty(strategy)
            }
        }
    }
}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use barkeep_core::Result;
    use barkeep_storage::InMemoryGraph;
    use mockall::mock;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    mock! {
        Extraction {}

        #[async_trait]
        impl ExtractionService for Extraction {
            async fn extract(
                &self,
                strategy: StrategyId,
                query: &str,
                categories: &[String],
            ) -> Result<Value>;
        }
    }

    #[test]
    fn test_parse_visual_with_aliases_and_cleanup() {
        let keywords = KeywordSet::parse(
            StrategyId::VisualIngredient,
            &json!({
                "cocktail": "Negroni",
                "ingredient": [" gin ", "Gin", ""],
                "glassType": null,
                "visual_keywords": ["red"]
            }),
        )
        .unwrap();

        assert_eq!(
            keywords,
            KeywordSet::Visual(VisualKeywords {
                cocktails: vec!["Negroni".to_string()],
                include_ingredients: vec!["gin".to_string()],
                visual_terms: vec!["red".to_string()],
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_include_ingredients_wins_over_alias() {
        let keywords = KeywordSet::parse(
            StrategyId::GlassProgressive,
            &json!({"include_ingredients": ["lime"], "ingredient": ["gin"]}),
        )
        .unwrap();
        let KeywordSet::Glass(glass) = keywords else {
            panic!("expected glass keywords");
        };
        assert_eq!(glass.include_ingredients, vec!["lime".to_string()]);
    }

    #[test]
    fn test_parse_alternative_target() {
        let keywords =
            KeywordSet::parse(StrategyId::Alternative, &json!({"target_cocktail": ""})).unwrap();
        assert_eq!(keywords, KeywordSet::empty(StrategyId::Alternative));

        let keywords = KeywordSet::parse(
            StrategyId::Alternative,
            &json!({"target_cocktail": "Manhattan", "ingredients": ["bitters"]}),
        )
        .unwrap();
        assert_eq!(
            keywords,
            KeywordSet::Alternative(AlternativeKeywords {
                target_cocktail: Some("Manhattan".to_string()),
                ingredients: vec!["bitters".to_string()],
            })
        );
    }

    #[test]
    fn test_parse_rejects_malformed_documents() {
        assert_eq!(
            KeywordSet::parse(StrategyId::MultiHop, &json!(["gin"])),
            Err(KeywordParseError::NotAnObject)
        );
        assert!(matches!(
            KeywordSet::parse(StrategyId::MultiHop, &json!({"ingredients": ["gin", 3]})),
            Err(KeywordParseError::InvalidField { field, .. }) if field == "ingredients"
        ));
        assert!(KeywordSet::parse(StrategyId::MultiHop, &json!({"ingredients": 3})).is_err());
    }

    #[test]
    fn test_empty_sets() {
        for strategy in [
            StrategyId::VisualIngredient,
            StrategyId::GlassProgressive,
            StrategyId::MultiHop,
            StrategyId::Alternative,
        ] {
            let keywords = KeywordSet::empty(strategy);
            assert!(keywords.is_empty());
            assert_eq!(keywords.strategy(), strategy);
        }
    }

    #[tokio::test]
    async fn test_resolver_passes_graph_categories() {
        let mut extraction = MockExtraction::new();
        extraction
            .expect_extract()
            .withf(|strategy, _, categories| {
                *strategy == StrategyId::MultiHop
                    && categories.iter().map(String::as_str).eq(["Cocktail", "Shot"])
            })
            .times(2)
            .returning(|_, _, _| Ok(json!({"ingredients": ["rum"]})));

        let store = InMemoryGraph::new()
            .with_category("Shot")
            .with_category("Cocktail");
        let resolver = KeywordResolver::new(Arc::new(extraction), Arc::new(store));

        for _ in 0..2 {
            let keywords = resolver.resolve(StrategyId::MultiHop, "rum drinks").await;
            assert_eq!(
                keywords,
                KeywordSet::MultiHop(MultiHopKeywords {
                    ingredients: vec!["rum".to_string()],
                    cocktail_names: vec![],
                })
            );
        }
    }

    #[tokio::test]
    async fn test_resolver_degrades_to_empty_keywords() {
        let mut extraction = MockExtraction::new();
        extraction
            .expect_extract()
            .returning(|_, _, _| Err(barkeep_core::Error::language_model("offline")));

        let resolver =
            KeywordResolver::new(Arc::new(extraction), Arc::new(InMemoryGraph::failing()));
        let keywords = resolver.resolve(StrategyId::GlassProgressive, "highball").await;
        assert_eq!(keywords, KeywordSet::empty(StrategyId::GlassProgressive));
        assert_eq!(resolver.categories().await.len(), DEFAULT_CATEGORIES.len());
    }

    #[tokio::test]
    async fn test_resolver_rejects_invalid_document() {
        let mut extraction = MockExtraction::new();
        extraction
            .expect_extract()
            .returning(|_, _, _| Ok(json!({"visual_keywords": {"color": "red"}})));

        let resolver = KeywordResolver::new(Arc::new(extraction), Arc::new(InMemoryGraph::new()));
        let keywords = resolver.resolve(StrategyId::VisualIngredient, "red").await;
        assert_eq!(keywords, KeywordSet::empty(StrategyId::VisualIngredient));
    }
}
