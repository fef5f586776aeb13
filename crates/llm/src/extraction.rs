//! Free text to raw keyword JSON

use crate::error::LlmError;
use crate::json::{parse_json_response, truncate_for_error};
use crate::model::LanguageModel;
use crate::prompts;
use async_trait::async_trait;
use barkeep_core::error::Result;
use barkeep_core::StrategyId;
use std::sync::Arc;
use tracing::debug;

/// Extracts the strategy-specific keyword document for a query
///
/// The returned value is untyped; callers validate it against the
/// strategy's keyword schema.
#[async_trait]
pub trait ExtractionService: Send + Sync {
    async fn extract(
        &self,
        strategy: StrategyId,
        query: &str,
        categories: &[String],
    ) -> Result<serde_json::Value>;
}

/// [`ExtractionService`] backed by a chat model
pub struct LlmExtractionService {
    model: Arc<dyn LanguageModel>,
}

impl LlmExtractionService {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl ExtractionService for LlmExtractionService {
    async fn extract(
        &self,
        strategy: StrategyId,
        query: &str,
        categories: &[String],
    ) -> Result<serde_json::Value> {
        let category_list = categories.join(", ");
        let prompt = prompts::format_prompt(
            prompts::keyword_template(strategy),
            &[("query", query), ("categories", &category_list)],
        );

        let response = self
            .model
            .complete(prompts::EXTRACTION_SYSTEM, &prompt)
            .await?;

        let value = parse_json_response(&response)
            .ok_or_else(|| LlmError::NoJson(truncate_for_error(&response)))?;
        debug!("Extracted {strategy} keywords: {value}");
        Ok(value)
    }
}
