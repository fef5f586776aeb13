//! Default values and functions for configuration

// Default constants
pub(crate) const DEFAULT_EMBEDDING_PROVIDER: &str = "openai";
pub(crate) const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub(crate) const DEFAULT_LLM_PROVIDER: &str = "openai";
pub(crate) const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
pub(crate) const DEFAULT_NEO4J_HOST: &str = "localhost";
pub(crate) const DEFAULT_NEO4J_USER: &str = "neo4j";
pub(crate) const DEFAULT_NEO4J_PASSWORD: &str = "password";
pub(crate) const DEFAULT_DESCRIPTION_INDEX: &str = "cocktail_imageDescription_embedding";

pub(crate) fn default_embedding_provider() -> String {
    DEFAULT_EMBEDDING_PROVIDER.to_string()
}

pub(crate) fn default_embedding_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

pub(crate) fn default_embedding_retry_attempts() -> usize {
    3
}

pub(crate) fn default_texts_per_api_request() -> usize {
    64
}

pub(crate) fn default_max_concurrent_api_requests() -> usize {
    4
}

pub(crate) fn default_mock_dimension() -> usize {
    8
}

pub(crate) fn default_llm_provider() -> String {
    DEFAULT_LLM_PROVIDER.to_string()
}

pub(crate) fn default_llm_model() -> String {
    DEFAULT_LLM_MODEL.to_string()
}

pub(crate) fn default_vision_model() -> String {
    DEFAULT_LLM_MODEL.to_string()
}

pub(crate) fn default_temperature() -> f32 {
    0.0
}

pub(crate) fn default_max_tokens() -> u32 {
    1024
}

pub(crate) fn default_llm_timeout_secs() -> u64 {
    60
}

pub(crate) fn default_neo4j_host() -> String {
    DEFAULT_NEO4J_HOST.to_string()
}

pub(crate) fn default_neo4j_bolt_port() -> u16 {
    7687
}

pub(crate) fn default_neo4j_user() -> String {
    DEFAULT_NEO4J_USER.to_string()
}

pub(crate) fn default_neo4j_password() -> String {
    DEFAULT_NEO4J_PASSWORD.to_string()
}

pub(crate) fn default_description_index() -> String {
    DEFAULT_DESCRIPTION_INDEX.to_string()
}

pub(crate) fn default_initial_top_k() -> usize {
    6
}

pub(crate) fn default_fallback_top_k() -> usize {
    10
}

pub(crate) fn default_visual_similarity_threshold() -> f32 {
    0.7
}

pub(crate) fn default_expansion_per_ingredient() -> usize {
    3
}

pub(crate) fn default_expansion_min_similarity() -> f32 {
    0.3
}

pub(crate) fn default_min_candidates_threshold() -> usize {
    2
}

pub(crate) fn default_target_candidates() -> usize {
    5
}

pub(crate) fn default_expansion_top_k() -> usize {
    8
}

pub(crate) fn default_min_ingredient_match() -> usize {
    1
}

pub(crate) fn default_min_cocktail_usage() -> usize {
    2
}

pub(crate) fn default_name_similarity_threshold() -> f32 {
    0.7
}

pub(crate) fn default_name_lookup_limit() -> usize {
    3
}

pub(crate) fn default_complexity_tolerance() -> usize {
    2
}

pub(crate) fn default_min_shared_ingredients() -> usize {
    1
}

pub(crate) fn default_min_target_ingredient_matches() -> usize {
    2
}

pub(crate) fn default_initial_breadth() -> usize {
    3
}

pub(crate) fn default_breadth_step() -> usize {
    1
}

pub(crate) fn default_max_rounds() -> usize {
    3
}

pub(crate) fn default_stop_score() -> f32 {
    80.0
}
