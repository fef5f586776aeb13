use barkeep_core::config::{Config, RetrievalConfig, StorageConfig};
use pretty_assertions::assert_eq;

#[test]
fn test_storage_config_defaults() {
    let config = StorageConfig::default();
    assert_eq!(config.neo4j_uri, None);
    assert_eq!(config.neo4j_host, "localhost");
    assert_eq!(config.neo4j_bolt_port, 7687);
    assert_eq!(config.neo4j_user, "neo4j");
    assert_eq!(config.bolt_uri(), "bolt://localhost:7687");
}

#[test]
fn test_retrieval_config_defaults() {
    let config = RetrievalConfig::default();
    assert_eq!(config.initial_top_k, 6);
    assert_eq!(config.fallback_top_k, 10);
    assert_eq!(config.visual.similarity_threshold, 0.7);
    assert_eq!(config.visual.expansion_per_ingredient, 3);
    assert_eq!(config.visual.expansion_min_similarity, 0.3);
    assert_eq!(config.glass.min_candidates_threshold, 2);
    assert_eq!(config.glass.target_candidates, 5);
    assert_eq!(config.multi_hop.expansion_top_k, 8);
    assert_eq!(config.multi_hop.min_ingredient_match, 1);
    assert_eq!(config.multi_hop.min_cocktail_usage, 2);
    assert_eq!(config.multi_hop.name_lookup_limit, 3);
    assert_eq!(config.alternative.complexity_tolerance, 2);
    assert_eq!(config.alternative.min_shared_ingredients, 1);
    assert_eq!(config.alternative.min_target_ingredient_matches, 2);
}

#[test]
fn test_default_config_is_valid() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.refinement.initial_breadth, 3);
    assert_eq!(config.refinement.breadth_step, 1);
    assert_eq!(config.refinement.max_rounds, 3);
    assert_eq!(config.refinement.stop_score, 80.0);
}

#[test]
fn test_config_validation_embedding_provider() {
    let mut config = Config::default();

    config.embeddings.provider = "mock".to_string();
    assert!(config.validate().is_ok());

    config.embeddings.provider = "invalid".to_string();
    let result = config.validate();
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Invalid embeddings provider"));
}

#[test]
fn test_config_validation_llm_provider() {
    let mut config = Config::default();

    config.llm.provider = "anthropic".to_string();
    assert!(config.validate().is_ok());

    config.llm.provider = "ollama".to_string();
    let result = config.validate();
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Invalid llm provider"));
}

#[test]
fn test_config_validation_thresholds() {
    let mut config = Config::default();

    config.retrieval.visual.similarity_threshold = -1.0;
    assert!(config.validate().is_ok());

    config.retrieval.visual.similarity_threshold = 1.5;
    let result = config.validate();
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("retrieval.visual.similarity_threshold"));

    let mut config = Config::default();
    config.refinement.stop_score = 101.0;
    assert!(config.validate().is_err());

    config.refinement.stop_score = f32::NAN;
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_counts() {
    let mut config = Config::default();
    config.refinement.max_rounds = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.retrieval.glass.target_candidates = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.embeddings.max_concurrent_api_requests = 257;
    let result = config.validate();
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("too large"));

    // A zero breadth step keeps every round at the initial breadth
    let mut config = Config::default();
    config.refinement.breadth_step = 0;
    assert!(config.validate().is_ok());
}

#[test]
fn test_full_toml_document() {
    let toml = r#"
        [embeddings]
        provider = "mock"
        mock_dimension = 16

        [llm]
        provider = "anthropic"
        model = "claude-test"
        temperature = 0.2

        [storage]
        neo4j_uri = "neo4j://graph.internal:7687"
        neo4j_password = "hunter2"

        [retrieval]
        initial_top_k = 4

        [retrieval.glass]
        target_candidates = 7

        [retrieval.alternative]
        complexity_tolerance = 1

        [refinement]
        max_rounds = 5
        stop_score = 75.0
    "#;

    let config = Config::from_toml_str(toml).unwrap();
    assert!(config.validate().is_ok());

    assert_eq!(config.embeddings.mock_dimension, 16);
    assert_eq!(config.llm.model, "claude-test");
    assert_eq!(config.storage.bolt_uri(), "neo4j://graph.internal:7687");
    assert_eq!(config.retrieval.initial_top_k, 4);
    assert_eq!(config.retrieval.fallback_top_k, 10);
    assert_eq!(config.retrieval.glass.target_candidates, 7);
    assert_eq!(config.retrieval.glass.min_candidates_threshold, 2);
    assert_eq!(config.retrieval.alternative.complexity_tolerance, 1);
    assert_eq!(config.refinement.max_rounds, 5);
    assert_eq!(config.refinement.stop_score, 75.0);
    assert_eq!(config.refinement.initial_breadth, 3);

    let debug = format!("{config:?}");
    assert!(!debug.contains("hunter2"));
}
