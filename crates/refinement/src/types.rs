//! Public request and outcome types for the refinement loop

use crate::error::RefinementError;
use barkeep_core::{Candidate, QualityAssessment, QualityScores, StrategyId, TaskClassification};
use barkeep_retrieval::KeywordSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum query length in characters
pub const MAX_QUERY_LENGTH: usize = 10000;

/// One question for the loop
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefinementRequest {
    pub query: String,
    /// Local file path or URL of an image to describe and prepend
    #[serde(default)]
    pub image: Option<String>,
    /// Skips classification when set
    #[serde(default)]
    pub strategy: Option<StrategyId>,
}

impl RefinementRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_strategy(mut self, strategy: StrategyId) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Validate the request, checking query constraints
    pub fn validate(&self) -> Result<(), RefinementError> {
        if self.query.trim().is_empty() && self.image.is_none() {
            return Err(RefinementError::InvalidRequest(
                "Query cannot be empty".to_string(),
            ));
        }
        if self.query.chars().count() > MAX_QUERY_LENGTH {
            return Err(RefinementError::InvalidRequest(format!(
                "Query exceeds maximum length of {MAX_QUERY_LENGTH} characters"
            )));
        }
        Ok(())
    }
}

/// How a round obtained its candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMode {
    /// First round, full strategy computation
    Full,
    /// Prefix of the cached full ranking
    Cached,
    /// Strategy recomputed at the new breadth
    Recomputed,
}

impl std::fmt::Display for RetrievalMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Full => "full",
            Self::Cached => "cached",
            Self::Recomputed => "recomputed",
        };
        f.write_str(name)
    }
}

/// One retrieve and score cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round: usize,
    pub breadth: usize,
    pub candidates: Vec<Candidate>,
    pub assessment: QualityAssessment,
    pub aggregate: f32,
    pub should_retry: bool,
    pub retrieval_mode: RetrievalMode,
}

impl RoundResult {
    pub fn summary(&self) -> RoundSummary {
        RoundSummary {
            round: self.round,
            breadth: self.breadth,
            aggregate: self.aggregate,
            scores: self.assessment.scores,
            should_retry: self.should_retry,
            candidate_count: self.candidates.len(),
            retrieval_mode: self.retrieval_mode,
        }
    }
}

/// History entry for one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: usize,
    pub breadth: usize,
    pub aggregate: f32,
    pub scores: QualityScores,
    pub should_retry: bool,
    pub candidate_count: usize,
    pub retrieval_mode: RetrievalMode,
}

/// Everything a completed loop produced
#[derive(Debug, Clone, Serialize)]
pub struct RefinementOutcome {
    pub run_id: Uuid,
    /// Query text after any image description was prepended
    pub query: String,
    pub classification: TaskClassification,
    pub keywords: KeywordSet,
    /// Round 1, kept for before and after reporting
    pub initial: RoundResult,
    pub best: RoundResult,
    pub history: Vec<RoundSummary>,
    pub elapsed_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_empty_query_rejected() {
        let result = RefinementRequest::new("").validate();
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Query cannot be empty"));
    }

    #[test]
    fn test_validate_whitespace_query_rejected() {
        assert!(RefinementRequest::new("   ").validate().is_err());
    }

    #[test]
    fn test_validate_image_only_accepted() {
        let request = RefinementRequest::new("").with_image("photo.jpg");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_validate_query_exceeds_max_length() {
        let result = RefinementRequest::new("a".repeat(MAX_QUERY_LENGTH + 1)).validate();
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("exceeds maximum length"));
    }

    #[test]
    fn test_validate_query_at_max_length() {
        let request = RefinementRequest::new("é".repeat(MAX_QUERY_LENGTH));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_retrieval_mode_serializes_snake_case() {
        let json = serde_json::to_string(&RetrievalMode::Recomputed).unwrap();
        assert_eq!(json, "\"recomputed\"");
        assert_eq!(RetrievalMode::Cached.to_string(), "cached");
    }
}
