use crate::{GraphStore, Neo4jGraphStore};
use barkeep_core::{config::StorageConfig, Error};
use std::sync::Arc;

/// Connects to the configured graph database.
///
/// Returns a trait object so strategies stay independent of the backend.
///
/// # Errors
/// Returns an error if the Neo4j connection cannot be established
pub async fn create_graph_store(config: &StorageConfig) -> Result<Arc<dyn GraphStore>, Error> {
    let store = Neo4jGraphStore::new(config).await?;
    Ok(Arc::new(store) as Arc<dyn GraphStore>)
}
