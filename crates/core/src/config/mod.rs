//! Configuration module for barkeep
//!
//! Configuration can be loaded from TOML files and/or environment variables.
//! Every section has defaults, so an empty file is a valid configuration.

mod defaults;
mod loading;


use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use defaults::*;

/// Returns the path to the global configuration file
///
/// The global config is stored at `~/.barkeep/config.toml`.
pub fn global_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| Error::config("Unable to determine home directory".to_string()))?;
    Ok(home_dir.join(".barkeep").join("config.toml"))
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Embeddings configuration
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,

    /// Hosted language model configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Graph storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Strategy tuning
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Refinement loop configuration
    #[serde(default)]
    pub refinement: RefinementConfig,
}

/// Configuration for embeddings generation
///
/// # Providers
/// - `openai` (default): OpenAI-compatible API, uses OPENAI_API_KEY / EMBEDDING_API_KEY env vars
/// - `mock`: deterministic provider for testing
#[derive(Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    /// Provider type: "openai" (default), "mock"
    #[serde(default = "default_embedding_provider")]
    pub provider: String,

    /// Model name to use
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// API base URL for OpenAI-compatible servers
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// API key for authentication
    #[serde(default)]
    pub api_key: Option<String>,

    /// Number of retry attempts for failed embedding requests
    #[serde(default = "default_embedding_retry_attempts")]
    pub retry_attempts: usize,

    /// Number of texts sent in a single embedding API request
    #[serde(default = "default_texts_per_api_request")]
    pub texts_per_api_request: usize,

    /// Maximum concurrent embedding API requests
    #[serde(default = "default_max_concurrent_api_requests")]
    pub max_concurrent_api_requests: usize,

    /// Vector dimension reported by the mock provider
    #[serde(default = "default_mock_dimension")]
    pub mock_dimension: usize,
}

impl std::fmt::Debug for EmbeddingsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingsConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field(
                "api_key",
                &self.api_key.as_ref().map(|_| "***REDACTED***"),
            )
            .field("retry_attempts", &self.retry_attempts)
            .field("texts_per_api_request", &self.texts_per_api_request)
            .field(
                "max_concurrent_api_requests",
                &self.max_concurrent_api_requests,
            )
            .field("mock_dimension", &self.mock_dimension)
            .finish()
    }
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            model: default_embedding_model(),
            api_base_url: None,
            api_key: None,
            retry_attempts: default_embedding_retry_attempts(),
            texts_per_api_request: default_texts_per_api_request(),
            max_concurrent_api_requests: default_max_concurrent_api_requests(),
            mock_dimension: default_mock_dimension(),
        }
    }
}

/// Configuration for the hosted language model
///
/// # Providers
/// - `openai` (default): chat completions, uses OPENAI_API_KEY
/// - `anthropic`: messages API, uses ANTHROPIC_API_KEY
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider type: "openai" (default), "anthropic"
    #[serde(default = "default_llm_provider")]
    pub provider: String,

    /// Model used for extraction, classification and scoring
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Vision-capable model used to describe images
    #[serde(default = "default_vision_model")]
    pub vision_model: String,

    /// API base URL for OpenAI-compatible servers
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// API key for authentication
    #[serde(default)]
    pub api_key: Option<String>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("vision_model", &self.vision_model)
            .field("api_base_url", &self.api_base_url)
            .field(
                "api_key",
                &self.api_key.as_ref().map(|_| "***REDACTED***"),
            )
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            model: default_llm_model(),
            vision_model: default_vision_model(),
            api_base_url: None,
            api_key: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

/// Neo4j connection configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Full bolt URI; takes precedence over host and port
    #[serde(default)]
    pub neo4j_uri: Option<String>,

    #[serde(default = "default_neo4j_host")]
    pub neo4j_host: String,

    #[serde(default = "default_neo4j_bolt_port")]
    pub neo4j_bolt_port: u16,

    #[serde(default = "default_neo4j_user")]
    pub neo4j_user: String,

    #[serde(default = "default_neo4j_password")]
    pub neo4j_password: String,

    /// Vector index over cocktail description embeddings
    #[serde(default = "default_description_index")]
    pub description_index: String,
}

impl StorageConfig {
    /// The bolt URI to connect to
    pub fn bolt_uri(&self) -> String {
        match &self.neo4j_uri {
            Some(uri) if !uri.trim().is_empty() => uri.clone(),
            _ => format!("bolt://{}:{}", self.neo4j_host, self.neo4j_bolt_port),
        }
    }
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("neo4j_uri", &self.neo4j_uri)
            .field("neo4j_host", &self.neo4j_host)
            .field("neo4j_bolt_port", &self.neo4j_bolt_port)
            .field("neo4j_user", &self.neo4j_user)
            .field("neo4j_password", &"***REDACTED***")
            .field("description_index", &self.description_index)
            .finish()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            neo4j_uri: None,
            neo4j_host: default_neo4j_host(),
            neo4j_bolt_port: default_neo4j_bolt_port(),
            neo4j_user: default_neo4j_user(),
            neo4j_password: default_neo4j_password(),
            description_index: default_description_index(),
        }
    }
}

/// Tuning shared by all strategies plus one table per strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Size of the initial candidate pools
    #[serde(default = "default_initial_top_k")]
    pub initial_top_k: usize,

    /// Size of the nearest-neighbour fallback list
    #[serde(default = "default_fallback_top_k")]
    pub fallback_top_k: usize,

    #[serde(default)]
    pub visual: VisualConfig,

    #[serde(default)]
    pub glass: GlassConfig,

    #[serde(default)]
    pub multi_hop: MultiHopConfig,

    #[serde(default)]
    pub alternative: AlternativeConfig,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            initial_top_k: default_initial_top_k(),
            fallback_top_k: default_fallback_top_k(),
            visual: VisualConfig::default(),
            glass: GlassConfig::default(),
            multi_hop: MultiHopConfig::default(),
            alternative: AlternativeConfig::default(),
        }
    }
}

/// Visual-ingredient expansion tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualConfig {
    /// Minimum vector-index score for the initial set
    #[serde(default = "default_visual_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Cocktails kept per winning ingredient
    #[serde(default = "default_expansion_per_ingredient")]
    pub expansion_per_ingredient: usize,

    /// Expanded cocktails must score strictly above this
    #[serde(default = "default_expansion_min_similarity")]
    pub expansion_min_similarity: f32,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_visual_similarity_threshold(),
            expansion_per_ingredient: default_expansion_per_ingredient(),
            expansion_min_similarity: default_expansion_min_similarity(),
        }
    }
}

/// Glass-first progressive matching tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlassConfig {
    /// A strict level yielding this many or fewer continues relaxing
    #[serde(default = "default_min_candidates_threshold")]
    pub min_candidates_threshold: usize,

    /// Relaxation stops once this many candidates are collected
    #[serde(default = "default_target_candidates")]
    pub target_candidates: usize,
}

impl Default for GlassConfig {
    fn default() -> Self {
        Self {
            min_candidates_threshold: default_min_candidates_threshold(),
            target_candidates: default_target_candidates(),
        }
    }
}

/// Multi-hop ingredient expansion tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiHopConfig {
    #[serde(default = "default_expansion_top_k")]
    pub expansion_top_k: usize,

    #[serde(default = "default_min_ingredient_match")]
    pub min_ingredient_match: usize,

    #[serde(default = "default_min_cocktail_usage")]
    pub min_cocktail_usage: usize,

    #[serde(default = "default_name_similarity_threshold")]
    pub name_similarity_threshold: f32,

    #[serde(default = "default_name_lookup_limit")]
    pub name_lookup_limit: usize,
}

impl Default for MultiHopConfig {
    fn default() -> Self {
        Self {
            expansion_top_k: default_expansion_top_k(),
            min_ingredient_match: default_min_ingredient_match(),
            min_cocktail_usage: default_min_cocktail_usage(),
            name_similarity_threshold: default_name_similarity_threshold(),
            name_lookup_limit: default_name_lookup_limit(),
        }
    }
}

/// Relationship-and-complexity alternative search tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativeConfig {
    /// Allowed difference in ingredient count from the target
    #[serde(default = "default_complexity_tolerance")]
    pub complexity_tolerance: usize,

    #[serde(default = "default_min_shared_ingredients")]
    pub min_shared_ingredients: usize,

    #[serde(default = "default_name_similarity_threshold")]
    pub name_similarity_threshold: f32,

    /// Matches needed to derive a target from an ingredient list
    #[serde(default = "default_min_target_ingredient_matches")]
    pub min_target_ingredient_matches: usize,
}

impl Default for AlternativeConfig {
    fn default() -> Self {
        Self {
            complexity_tolerance: default_complexity_tolerance(),
            min_shared_ingredients: default_min_shared_ingredients(),
            name_similarity_threshold: default_name_similarity_threshold(),
            min_target_ingredient_matches: default_min_target_ingredient_matches(),
        }
    }
}

/// Refinement loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinementConfig {
    #[serde(default = "default_initial_breadth")]
    pub initial_breadth: usize,

    #[serde(default = "default_breadth_step")]
    pub breadth_step: usize,

    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,

    /// Aggregate score at or above which the loop stops
    #[serde(default = "default_stop_score")]
    pub stop_score: f32,
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self {
            initial_breadth: default_initial_breadth(),
            breadth_step: default_breadth_step(),
            max_rounds: default_max_rounds(),
            stop_score: default_stop_score(),
        }
    }
}

fn check_positive(value: usize, field: &str) -> Result<()> {
    if value == 0 {
        return Err(Error::config(format!("{field} must be greater than 0")));
    }
    Ok(())
}

fn check_range(value: f32, min: f32, max: f32, field: &str) -> Result<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(Error::config(format!(
            "{field} must be within [{min}, {max}], got {value}"
        )));
    }
    Ok(())
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        let valid_embedding_providers = ["openai", "mock"];
        if !valid_embedding_providers.contains(&self.embeddings.provider.as_str()) {
            return Err(Error::config(format!(
                "Invalid embeddings provider '{}'. Must be one of: {:?}",
                self.embeddings.provider, valid_embedding_providers
            )));
        }

        let valid_llm_providers = ["openai", "anthropic"];
        if !valid_llm_providers.contains(&self.llm.provider.as_str()) {
            return Err(Error::config(format!(
                "Invalid llm provider '{}'. Must be one of: {:?}",
                self.llm.provider, valid_llm_providers
            )));
        }

        check_positive(
            self.embeddings.texts_per_api_request,
            "embeddings.texts_per_api_request",
        )?;
        check_positive(
            self.embeddings.max_concurrent_api_requests,
            "embeddings.max_concurrent_api_requests",
        )?;
        if self.embeddings.max_concurrent_api_requests > 256 {
            return Err(Error::config(format!(
                "embeddings.max_concurrent_api_requests too large (max 256, got {})",
                self.embeddings.max_concurrent_api_requests
            )));
        }
        check_positive(self.embeddings.mock_dimension, "embeddings.mock_dimension")?;

        check_range(self.llm.temperature, 0.0, 2.0, "llm.temperature")?;
        if self.llm.max_tokens == 0 {
            return Err(Error::config(
                "llm.max_tokens must be greater than 0".to_string(),
            ));
        }

        if self.storage.description_index.trim().is_empty() {
            return Err(Error::config(
                "storage.description_index must not be empty".to_string(),
            ));
        }

        let retrieval = &self.retrieval;
        check_positive(retrieval.initial_top_k, "retrieval.initial_top_k")?;
        check_positive(retrieval.fallback_top_k, "retrieval.fallback_top_k")?;
        check_range(
            retrieval.visual.similarity_threshold,
            -1.0,
            1.0,
            "retrieval.visual.similarity_threshold",
        )?;
        check_range(
            retrieval.visual.expansion_min_similarity,
            -1.0,
            1.0,
            "retrieval.visual.expansion_min_similarity",
        )?;
        check_positive(
            retrieval.glass.target_candidates,
            "retrieval.glass.target_candidates",
        )?;
        check_positive(
            retrieval.multi_hop.expansion_top_k,
            "retrieval.multi_hop.expansion_top_k",
        )?;
        check_positive(
            retrieval.multi_hop.min_ingredient_match,
            "retrieval.multi_hop.min_ingredient_match",
        )?;
        check_positive(
            retrieval.multi_hop.min_cocktail_usage,
            "retrieval.multi_hop.min_cocktail_usage",
        )?;
        check_range(
            retrieval.multi_hop.name_similarity_threshold,
            -1.0,
            1.0,
            "retrieval.multi_hop.name_similarity_threshold",
        )?;
        check_positive(
            retrieval.multi_hop.name_lookup_limit,
            "retrieval.multi_hop.name_lookup_limit",
        )?;
        check_range(
            retrieval.alternative.name_similarity_threshold,
            -1.0,
            1.0,
            "retrieval.alternative.name_similarity_threshold",
        )?;
        check_positive(
            retrieval.alternative.min_shared_ingredients,
            "retrieval.alternative.min_shared_ingredients",
        )?;
        check_positive(
            retrieval.alternative.min_target_ingredient_matches,
            "retrieval.alternative.min_target_ingredient_matches",
        )?;

        check_positive(self.refinement.initial_breadth, "refinement.initial_breadth")?;
        check_positive(self.refinement.max_rounds, "refinement.max_rounds")?;
        check_range(
            self.refinement.stop_score,
            0.0,
            100.0,
            "refinement.stop_score",
        )?;

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, toml_string)?;
        Ok(())
    }
}
