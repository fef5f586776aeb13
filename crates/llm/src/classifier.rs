//! Query to retrieval strategy classification

use crate::json::parse_json_response;
use crate::model::LanguageModel;
use crate::prompts;
use async_trait::async_trait;
use barkeep_core::error::Result;
use barkeep_core::{StrategyId, TaskClassification};
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

/// Picks the retrieval strategy for a query
///
/// Implementations return `Err` only when the backing service fails;
/// unusable answers resolve to [`TaskClassification::fallback`].
#[async_trait]
pub trait TaskClassifier: Send + Sync {
    async fn classify(&self, query: &str) -> Result<TaskClassification>;
}

/// [`TaskClassifier`] backed by a chat model
pub struct LlmTaskClassifier {
    model: Arc<dyn LanguageModel>,
}

impl LlmTaskClassifier {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl TaskClassifier for LlmTaskClassifier {
    async fn classify(&self, query: &str) -> Result<TaskClassification> {
        if query.trim().is_empty() {
            return Ok(TaskClassification::fallback("empty query"));
        }

        let prompt = prompts::format_prompt(prompts::TASK_CLASSIFIER, &[("query", query)]);
        let response = self
            .model
            .complete(prompts::CLASSIFIER_SYSTEM, &prompt)
            .await?;

        let classification = match parse_json_response(&response) {
            Some(value) => classification_from_json(&value),
            None => {
                warn!("Classifier answer contained no JSON, using fallback");
                TaskClassification::fallback("classifier answer was not JSON")
            }
        };

        info!(
            "Classified as {} ({}) with confidence {}",
            classification.strategy,
            classification.strategy.description(),
            classification.confidence
        );
        Ok(classification)
    }
}

/// Reads `{"task", "confidence", "reason"}`
pub fn classification_from_json(value: &Value) -> TaskClassification {
    let task = value
        .get("task")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();

    let strategy = match StrategyId::from_str(task) {
        Ok(strategy) => strategy,
        Err(_) => {
            warn!("Unknown task code '{task}', using fallback");
            return TaskClassification::fallback(format!("unknown task code '{task}'"));
        }
    };

    let confidence = match value.get("confidence") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or_default() as f32,
        Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => 0.0,
    };

    TaskClassification {
        strategy,
        confidence: if confidence.is_finite() {
            confidence.clamp(0.0, 100.0)
        } else {
            0.0
        },
        reason: value
            .get("reason")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    }
}
