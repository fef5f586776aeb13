//! Node labels and relationship types of the cocktail graph
//!
//! Cypher cannot parameterise labels or relationship types, so queries
//! interpolate these enums and never caller-supplied strings.

use serde::{Deserialize, Serialize};

/// Node labels present in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeLabel {
    Cocktail,
    Ingredient,
    Category,
    GlassType,
}

impl NodeLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cocktail => "Cocktail",
            Self::Ingredient => "Ingredient",
            Self::Category => "Category",
            Self::GlassType => "GlassType",
        }
    }
}

/// Outgoing relationships from a cocktail node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relationship {
    /// Cocktail to Ingredient, carries a `measure` property
    HasIngredient,
    /// Cocktail to Category
    Category,
    /// Cocktail to GlassType
    HasGlassType,
}

impl Relationship {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HasIngredient => "HAS_INGREDIENT",
            Self::Category => "CATEGORY",
            Self::HasGlassType => "HAS_GLASSTYPE",
        }
    }

    /// Label of the node at the far end of the relationship
    pub fn target_label(&self) -> NodeLabel {
        match self {
            Self::HasIngredient => NodeLabel::Ingredient,
            Self::Category => NodeLabel::Category,
            Self::HasGlassType => NodeLabel::GlassType,
        }
    }
}

/// Allowed relationship types (prevents Cypher injection)
pub const ALLOWED_RELATIONSHIP_TYPES: &[&str] = &["HAS_INGREDIENT", "CATEGORY", "HAS_GLASSTYPE"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_names_are_allowed() {
        for rel in [
            Relationship::HasIngredient,
            Relationship::Category,
            Relationship::HasGlassType,
        ] {
            assert!(ALLOWED_RELATIONSHIP_TYPES.contains(&rel.as_str()));
        }
        assert_eq!(Relationship::HasGlassType.target_label(), NodeLabel::GlassType);
    }
}
