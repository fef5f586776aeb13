//! Read-only access to the cocktail knowledge graph
//!
//! [`GraphStore`] is the contract every retrieval strategy reads through.
//! [`Neo4jGraphStore`] talks to a live database; [`InMemoryGraph`] is a
//! fixture-driven stand-in used by tests across the workspace.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod error;
mod factory;
mod memory;
mod neo4j;
mod schema;
mod serialized;

pub use error::StorageError;
pub use factory::create_graph_store;
pub use memory::{CocktailFixture, InMemoryGraph};
pub use neo4j::Neo4jGraphStore;
pub use schema::{NodeLabel, Relationship, ALLOWED_RELATIONSHIP_TYPES};
pub use serialized::{parse_or_empty, parse_serialized_list, recipe_lines, UNKNOWN_MEASURE};

use async_trait::async_trait;
use barkeep_core::{Candidate, Result, ScoredName};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==== Traits ====

/// Read contract over the cocktail graph
///
/// Name comparisons against ingredient, category and glass nodes are
/// case-insensitive. Cocktail names are returned as stored.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// All category names, sorted
    async fn category_names(&self) -> Result<Vec<String>>;

    /// Name embeddings of every node with the given label
    async fn name_embeddings(&self, label: NodeLabel) -> Result<Vec<NamedEmbedding>>;

    /// Cocktails whose name contains `fragment`, shortest names first
    async fn find_cocktails_by_name_fragment(
        &self,
        fragment: &str,
        limit: usize,
    ) -> Result<Vec<String>>;

    /// Top-k cocktails from the description vector index
    async fn vector_search(&self, embedding: &[f32], k: usize) -> Result<Vec<ScoredName>>;

    /// Description embeddings for the named cocktails; names without one are absent
    async fn description_embeddings(&self, names: &[String])
        -> Result<HashMap<String, Vec<f32>>>;

    /// Names of the nodes a cocktail points at through `relationship`
    async fn related_names(&self, cocktail: &str, relationship: Relationship)
        -> Result<Vec<String>>;

    /// Cocktails pointing at `target` through `relationship`
    async fn cocktails_related_to(
        &self,
        relationship: Relationship,
        target: &str,
    ) -> Result<Vec<String>>;

    /// Cocktails linked to at least `min_matches` of `targets`
    ///
    /// Ordered by match count descending, then name.
    async fn cocktails_sharing(
        &self,
        relationship: Relationship,
        targets: &[String],
        min_matches: usize,
    ) -> Result<Vec<MatchCount>>;

    /// Cocktails linked to every one of `targets`; empty when `targets` is empty
    async fn cocktails_with_all(
        &self,
        relationship: Relationship,
        targets: &[String],
    ) -> Result<Vec<String>>;

    /// Number of distinct ingredients of each named cocktail
    async fn ingredient_counts(&self, names: &[String]) -> Result<HashMap<String, usize>>;

    /// Hydrates cocktails in request order, skipping unknown names
    async fn cocktail_details(&self, names: &[String]) -> Result<Vec<Candidate>>;
}

// ==== Models ====

/// A node name with its stored name embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedEmbedding {
    pub name: String,
    pub embedding: Vec<f32>,
}

/// A cocktail and how many of the requested targets it links to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCount {
    pub name: String,
    pub matches: usize,
}
