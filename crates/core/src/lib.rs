//! Core types for the barkeep cocktail recommendation engine
//!
//! This crate provides the foundational pieces shared by every other
//! barkeep crate:
//!
//! - **Models**: strategy identifiers, hydrated candidates, quality scores
//! - **Configuration**: layered configuration loading and validation
//! - **Error handling**: unified error types
//!
#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod config;
pub mod error;
pub mod models;

// Re-export main types for convenience
pub use config::{
    AlternativeConfig, Config, EmbeddingsConfig, GlassConfig, LlmConfig, MultiHopConfig,
    RefinementConfig, RetrievalConfig, StorageConfig, VisualConfig,
};
pub use error::{Error, Result, ResultExt};
pub use models::{
    Candidate, QualityAssessment, QualityScores, RecipeIngredient, ScoredName, StrategyId,
    TaskClassification,
};

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Result, ResultExt};
    pub use crate::models::{Candidate, StrategyId};
}
