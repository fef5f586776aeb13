//! Hosted language model collaborators
//!
//! This crate wraps a chat model behind [`LanguageModel`] and builds the four
//! model-backed services on top of it:
//!
//! - [`ExtractionService`] - free text to the raw keyword document of a strategy
//! - [`ScoringService`] - quality sub-scores for a candidate set
//! - [`TaskClassifier`] - picks the retrieval strategy for a query
//! - [`ImageDescriber`] - turns an image into a short text description
//!
//! Prompts and JSON extraction from chatty model output are private.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod anthropic;
mod classifier;
mod error;
mod extraction;
mod json;
mod model;
mod openai;
mod prompts;
mod scoring;
mod vision;

#[cfg(test)]
mod test_support;

pub use classifier::{classification_from_json, LlmTaskClassifier, TaskClassifier};
pub use error::LlmError;
pub use extraction::{ExtractionService, LlmExtractionService};
pub use json::extract_json;
pub use model::{create_language_model, LanguageModel, LanguageModelProvider};
pub use scoring::{assessment_from_json, LlmScoringService, ScoringService};
pub use vision::{image_url, ImageDescriber, OpenAiImageDescriber};

use barkeep_core::config::LlmConfig;
use barkeep_core::error::Result;
use std::sync::Arc;

/// The model-backed collaborators of one process
pub struct LlmServices {
    pub extraction: Arc<dyn ExtractionService>,
    pub scoring: Arc<dyn ScoringService>,
    pub classifier: Arc<dyn TaskClassifier>,
    pub image_describer: Arc<dyn ImageDescriber>,
}

/// Builds every collaborator over one shared chat model
pub fn create_llm_services(config: &LlmConfig) -> Result<LlmServices> {
    let model = create_language_model(config)?;

    Ok(LlmServices {
        extraction: Arc::new(LlmExtractionService::new(model.clone())),
        scoring: Arc::new(LlmScoringService::new(model.clone())),
        classifier: Arc::new(LlmTaskClassifier::new(model)),
        image_describer: Arc::new(OpenAiImageDescriber::new(config)?),
    })
}
