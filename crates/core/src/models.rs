//! Shared domain models for cocktail retrieval
//!
//! These types cross crate boundaries: strategies produce [`Candidate`]s,
//! the scoring collaborator produces [`QualityAssessment`]s and the
//! classifier produces a [`TaskClassification`].

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Identifier of one of the four retrieval strategies
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum StrategyId {
    /// Visual-ingredient expansion
    #[strum(serialize = "C1")]
    #[serde(rename = "C1")]
    VisualIngredient,
    /// Glass-first progressive matching
    #[strum(serialize = "C2")]
    #[serde(rename = "C2")]
    GlassProgressive,
    /// Multi-hop ingredient expansion
    #[strum(serialize = "C3")]
    #[serde(rename = "C3")]
    MultiHop,
    /// Relationship-and-complexity alternative search
    #[strum(serialize = "C4")]
    #[serde(rename = "C4")]
    Alternative,
}

impl StrategyId {
    /// Human readable strategy name
    pub fn description(&self) -> &'static str {
        match self {
            Self::VisualIngredient => "visual-ingredient expansion",
            Self::GlassProgressive => "glass-first progressive matching",
            Self::MultiHop => "multi-hop ingredient expansion",
            Self::Alternative => "relationship-and-complexity alternative search",
        }
    }
}

impl Default for StrategyId {
    fn default() -> Self {
        Self::VisualIngredient
    }
}

/// One line of a cocktail recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub ingredient: String,
    pub measure: String,
}

impl RecipeIngredient {
    pub fn new(ingredient: impl Into<String>, measure: impl Into<String>) -> Self {
        Self {
            ingredient: ingredient.into(),
            measure: measure.into(),
        }
    }
}

/// A cocktail hydrated from the graph
///
/// Embeddings are carried for ranking but never serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub category: Option<String>,
    pub glass_type: Option<String>,
    pub alcoholic: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub image_description: Option<String>,
    /// Recipe lines with measures
    #[serde(default)]
    pub recipe: Vec<RecipeIngredient>,
    /// Ingredient names connected in the graph
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(skip)]
    pub name_embedding: Option<Vec<f32>>,
    #[serde(skip)]
    pub description_embedding: Option<Vec<f32>>,
    /// Ranking score, set during retrieval and never persisted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    /// Marks the resolved target of an alternative search
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_target: bool,
}

impl Candidate {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A name with a similarity or strength score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredName {
    pub name: String,
    pub score: f32,
}

impl ScoredName {
    pub fn new(name: impl Into<String>, score: f32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

const SCORE_FLOOR: f32 = 0.0;
const SCORE_CEILING: f32 = 100.0;
const NEUTRAL_SCORE: f32 = 50.0;

/// The four quality sub-scores of one round, each within [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityScores {
    pub relevance: f32,
    pub diversity: f32,
    pub completeness: f32,
    pub coherence: f32,
}

impl QualityScores {
    /// Builds scores, clamping each one into [0, 100]
    ///
    /// Non-finite inputs are treated as the neutral score.
    pub fn new(relevance: f32, diversity: f32, completeness: f32, coherence: f32) -> Self {
        Self {
            relevance: clamp_score(relevance),
            diversity: clamp_score(diversity),
            completeness: clamp_score(completeness),
            coherence: clamp_score(coherence),
        }
    }

    /// Scores of a round that retrieved nothing
    pub fn zero() -> Self {
        Self::new(SCORE_FLOOR, SCORE_FLOOR, SCORE_FLOOR, SCORE_FLOOR)
    }

    /// Scores substituted when the scoring collaborator fails
    pub fn neutral() -> Self {
        Self::new(NEUTRAL_SCORE, NEUTRAL_SCORE, NEUTRAL_SCORE, NEUTRAL_SCORE)
    }

    /// Arithmetic mean of the four sub-scores
    pub fn aggregate(&self) -> f32 {
        (self.relevance + self.diversity + self.completeness + self.coherence) / 4.0
    }
}

fn clamp_score(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(SCORE_FLOOR, SCORE_CEILING)
    } else {
        NEUTRAL_SCORE
    }
}

/// Output of the scoring collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub scores: QualityScores,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl QualityAssessment {
    pub fn neutral(feedback: impl Into<String>) -> Self {
        Self {
            scores: QualityScores::neutral(),
            feedback: feedback.into(),
            suggestions: Vec::new(),
        }
    }
}

/// Strategy chosen for a query by the task classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskClassification {
    pub strategy: StrategyId,
    /// Confidence in [0, 100]
    pub confidence: f32,
    pub reason: String,
}

impl TaskClassification {
    /// Classification used whenever the classifier cannot decide
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            strategy: StrategyId::default(),
            confidence: 0.0,
            reason: reason.into(),
        }
    }

    /// Classification recorded when the caller forces a strategy
    pub fn forced(strategy: StrategyId) -> Self {
        Self {
            strategy,
            confidence: 100.0,
            reason: "strategy selected by caller".to_string(),
        }
    }
}
