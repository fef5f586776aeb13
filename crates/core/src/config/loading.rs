//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, ConfigBuilder as LibConfigBuilder, Environment, File};
use std::path::Path;
use tracing::debug;

use super::defaults::*;
use super::{global_config_path, Config};

type Builder = LibConfigBuilder<config::builder::DefaultState>;

/// Helper to set a config default with consistent error mapping
fn set_config_default<T: Into<config::Value>>(
    builder: Builder,
    key: &str,
    value: T,
) -> Result<Builder> {
    builder
        .set_default(key, value)
        .map_err(|e| Error::config(format!("Failed to set {key} default: {e}")))
}

/// Helper to override a config key from a plain environment variable
fn override_from_env(builder: Builder, var: &str, key: &str) -> Result<Builder> {
    match std::env::var(var) {
        Ok(value) => builder
            .set_override(key, value)
            .map_err(|e| Error::config(format!("Failed to set {var}: {e}"))),
        Err(_) => Ok(builder),
    }
}

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `BARKEEP_` and use double underscores
    /// for nested values. For example:
    /// - `BARKEEP_LLM__PROVIDER=anthropic`
    /// - `BARKEEP_RETRIEVAL__GLASS__TARGET_CANDIDATES=7`
    pub fn from_file(path: &Path) -> Result<Self> {
        let builder = ConfigLib::builder();

        // Refinement defaults
        let builder = set_config_default(
            builder,
            "refinement.initial_breadth",
            default_initial_breadth() as i64,
        )?;
        let builder = set_config_default(
            builder,
            "refinement.breadth_step",
            default_breadth_step() as i64,
        )?;
        let builder =
            set_config_default(builder, "refinement.max_rounds", default_max_rounds() as i64)?;
        let builder =
            set_config_default(builder, "refinement.stop_score", default_stop_score() as f64)?;

        // Storage defaults
        let builder = set_config_default(builder, "storage.neo4j_host", default_neo4j_host())?;
        let builder = set_config_default(
            builder,
            "storage.neo4j_bolt_port",
            default_neo4j_bolt_port() as i64,
        )?;
        let builder = set_config_default(builder, "storage.neo4j_user", default_neo4j_user())?;
        let mut builder = set_config_default(
            builder,
            "storage.description_index",
            default_description_index(),
        )?;

        // Add the config file if it exists
        if path.exists() {
            debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(File::from(path));
        }

        // Add environment variables with BARKEEP_ prefix
        builder = builder.add_source(
            Environment::with_prefix("BARKEEP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // Neo4j configuration
        builder = override_from_env(builder, "NEO4J_URI", "storage.neo4j_uri")?;
        builder = override_from_env(builder, "NEO4J_HOST", "storage.neo4j_host")?;
        if let Ok(port) = std::env::var("NEO4J_BOLT_PORT") {
            if let Ok(port_num) = port.parse::<u16>() {
                builder = builder
                    .set_override("storage.neo4j_bolt_port", port_num)
                    .map_err(|e| Error::config(format!("Failed to set NEO4J_BOLT_PORT: {e}")))?;
            }
        }
        builder = override_from_env(builder, "NEO4J_USER", "storage.neo4j_user")?;
        builder = override_from_env(builder, "NEO4J_PASSWORD", "storage.neo4j_password")?;

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from a single file
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file (~/.barkeep/config.toml or custom --config path)
    /// 3. Environment variables (BARKEEP_*, NEO4J_*)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => global_config_path()?,
        };
        Self::from_file(&path)
    }
}
