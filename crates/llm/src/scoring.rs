//! Quality scoring of a retrieved candidate set

use crate::error::LlmError;
use crate::json::{parse_json_response, truncate_for_error};
use crate::model::LanguageModel;
use crate::prompts;
use async_trait::async_trait;
use barkeep_core::error::Result;
use barkeep_core::{QualityAssessment, QualityScores};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Score used for a sub-score the model left out or garbled
const MISSING_SCORE: f32 = 50.0;

/// Rates a candidate set against the query on four 0..100 dimensions
#[async_trait]
pub trait ScoringService: Send + Sync {
    /// `formatted_candidates` is the human readable candidate list,
    /// `count` the number of candidates it describes
    async fn score(
        &self,
        query: &str,
        formatted_candidates: &str,
        count: usize,
    ) -> Result<QualityAssessment>;
}

/// [`ScoringService`] backed by a chat model
pub struct LlmScoringService {
    model: Arc<dyn LanguageModel>,
}

impl LlmScoringService {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl ScoringService for LlmScoringService {
    async fn score(
        &self,
        query: &str,
        formatted_candidates: &str,
        count: usize,
    ) -> Result<QualityAssessment> {
        let count = count.to_string();
        let prompt = prompts::format_prompt(
            prompts::QUALITY_SCORING,
            &[
                ("query", query),
                ("count", &count),
                ("candidates", formatted_candidates),
            ],
        );

        let response = self.model.complete(prompts::SCORING_SYSTEM, &prompt).await?;
        let value = parse_json_response(&response)
            .ok_or_else(|| LlmError::NoJson(truncate_for_error(&response)))?;

        let assessment = assessment_from_json(&value);
        debug!(
            "Quality scores: relevance={} diversity={} completeness={} coherence={}",
            assessment.scores.relevance,
            assessment.scores.diversity,
            assessment.scores.completeness,
            assessment.scores.coherence
        );
        Ok(assessment)
    }
}

/// Builds an assessment from the model's JSON answer
///
/// Each sub-score accepts a number or a numeric string; anything else
/// counts as [`MISSING_SCORE`]. Values are clamped to [0, 100].
pub fn assessment_from_json(value: &Value) -> QualityAssessment {
    let scores = QualityScores::new(
        sub_score(value, "relevance"),
        sub_score(value, "diversity"),
        sub_score(value, "completeness"),
        sub_score(value, "coherence"),
    );

    let feedback = value
        .get("feedback")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let suggestions = value
        .get("suggestions")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    QualityAssessment {
        scores,
        feedback,
        suggestions,
    }
}

fn sub_score(value: &Value, field: &str) -> f32 {
    let parsed = match value.get(field) {
        Some(Value::Number(n)) => n.as_f64().map(|f| f as f32),
        Some(Value::String(s)) => s.trim().parse::<f32>().ok(),
        _ => None,
    };

    match parsed {
        Some(score) if score.is_finite() => score,
        _ => {
            warn!("Score field '{field}' missing or unparseable, using {MISSING_SCORE}");
            MISSING_SCORE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::replying;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_complete_answer() {
        let assessment = assessment_from_json(&json!({
            "relevance": 90, "diversity": 85, "completeness": 80, "coherence": 85,
            "feedback": "good spread",
            "suggestions": ["add a mocktail", 7]
        }));
        assert_eq!(assessment.scores, QualityScores::new(90.0, 85.0, 80.0, 85.0));
        assert_eq!(assessment.scores.aggregate(), 85.0);
        assert_eq!(assessment.feedback, "good spread");
        assert_eq!(assessment.suggestions, vec!["add a mocktail".to_string()]);
    }

    #[test]
    fn test_missing_and_garbled_fields_default_to_fifty() {
        let assessment = assessment_from_json(&json!({
            "relevance": "72", "diversity": "lots", "coherence": null
        }));
        assert_eq!(assessment.scores, QualityScores::new(72.0, 50.0, 50.0, 50.0));
        assert!(assessment.feedback.is_empty());
        assert!(assessment.suggestions.is_empty());
    }

    #[test]
    fn test_out_of_range_scores_are_clamped() {
        let assessment = assessment_from_json(&json!({
            "relevance": 140, "diversity": -5, "completeness": 100, "coherence": 0
        }));
        assert_eq!(assessment.scores, QualityScores::new(100.0, 0.0, 100.0, 0.0));
    }

    #[tokio::test]
    async fn test_service_parses_chatty_reply() {
        let service = LlmScoringService::new(Arc::new(replying(
            "Here you go:\n{\"relevance\": 60, \"diversity\": 60, \"completeness\": 60, \"coherence\": 60}",
        )));
        let assessment = service.score("red drink", "1. Negroni", 1).await.unwrap();
        assert_eq!(assessment.scores.aggregate(), 60.0);
    }

    #[tokio::test]
    async fn test_service_without_json_fails() {
        let service = LlmScoringService::new(Arc::new(replying("Looks fine to me.")));
        assert!(service.score("red drink", "1. Negroni", 1).await.is_err());
    }
}
