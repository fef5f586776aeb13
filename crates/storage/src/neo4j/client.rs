use anyhow::{Context, Result};
use async_trait::async_trait;
use barkeep_core::{Candidate, ScoredName, StorageConfig};
use neo4rs::{Graph, Query, Row};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::schema::{NodeLabel, Relationship};
use crate::serialized::{parse_or_empty, recipe_lines};
use crate::{GraphStore, MatchCount, NamedEmbedding};

/// Neo4j-backed [`GraphStore`]
pub struct Neo4jGraphStore {
    graph: Arc<Graph>,
    description_index: String,
}

fn to_f64(embedding: &[f32]) -> Vec<f64> {
    embedding.iter().map(|v| f64::from(*v)).collect()
}

fn to_f32(embedding: Vec<f64>) -> Vec<f32> {
    embedding.into_iter().map(|v| v as f32).collect()
}

fn lowercase_all(values: &[String]) -> Vec<String> {
    let mut lowered: Vec<String> = values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect();
    lowered.sort();
    lowered.dedup();
    lowered
}

/// Reads a list property stored either as serialized text or as a native list
fn read_list_property(row: &Row, key: &str, cocktail: &str) -> Vec<String> {
    if let Ok(raw) = row.get::<Option<String>>(key) {
        return parse_or_empty(cocktail, key, raw.as_deref());
    }
    row.get::<Option<Vec<String>>>(key)
        .ok()
        .flatten()
        .unwrap_or_default()
}

impl Neo4jGraphStore {
    /// Connect to Neo4j server with the provided configuration
    ///
    /// # Example
    /// ```no_run
    /// use barkeep_storage::Neo4jGraphStore;
    /// use barkeep_core::StorageConfig;
    ///
    /// # async fn example(config: &StorageConfig) -> anyhow::Result<()> {
    /// let store = Neo4jGraphStore::new(config).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        let uri = config.bolt_uri();

        info!("Connecting to Neo4j at {}", uri);

        let graph = Graph::new(&uri, &config.neo4j_user, &config.neo4j_password)
            .await
            .context("Failed to connect to Neo4j")?;

        Ok(Self {
            graph: Arc::new(graph),
            description_index: config.description_index.clone(),
        })
    }

    /// Runs a query and collects the `name` column
    async fn fetch_names(&self, query: Query, what: &str) -> Result<Vec<String>> {
        let mut result = self
            .graph
            .execute(query)
            .await
            .with_context(|| format!("Failed to query {what}"))?;

        let mut names = Vec::new();
        while let Some(row) = result.next().await? {
            names.push(row.get::<String>("name")?);
        }
        Ok(names)
    }

    /// Runs a query and collects `name` with an integer column
    async fn fetch_counts(&self, query: Query, column: &str) -> Result<Vec<(String, usize)>> {
        let mut result = self
            .graph
            .execute(query)
            .await
            .with_context(|| format!("Failed to query {column}"))?;

        let mut counts = Vec::new();
        while let Some(row) = result.next().await? {
            let name: String = row.get("name")?;
            let count: i64 = row.get(column)?;
            counts.push((name, count.max(0) as usize));
        }
        Ok(counts)
    }

    async fn fetch_embeddings(&self, query: Query) -> Result<Vec<NamedEmbedding>> {
        let mut result = self
            .graph
            .execute(query)
            .await
            .context("Failed to query embeddings")?;

        let mut embeddings = Vec::new();
        while let Some(row) = result.next().await? {
            let name: String = row.get("name")?;
            let embedding: Vec<f64> = row.get("embedding")?;
            embeddings.push(NamedEmbedding {
                name,
                embedding: to_f32(embedding),
            });
        }
        Ok(embeddings)
    }

    fn candidate_from_row(row: &Row) -> Result<Candidate> {
        let name: String = row.get("name")?;

        let ingredients = read_list_property(row, "ingredients", &name);
        let measures = read_list_property(row, "measures", &name);
        let mut recipe = recipe_lines(&ingredients, &measures);

        let edges: Vec<Vec<String>> = row.get("edges").unwrap_or_default();
        let edge_ingredients: Vec<String> = edges
            .iter()
            .filter_map(|pair| pair.first().cloned())
            .collect();
        if recipe.is_empty() {
            let edge_measures: Vec<String> = edges
                .iter()
                .map(|pair| pair.get(1).cloned().unwrap_or_default())
                .collect();
            recipe = recipe_lines(&edge_ingredients, &edge_measures);
        }

        Ok(Candidate {
            category: row.get("category")?,
            glass_type: row.get("glass_type")?,
            alcoholic: row.get("alcoholic")?,
            description: row.get("description")?,
            instructions: row.get("instructions")?,
            image_description: row.get("image_description")?,
            recipe,
            ingredients: edge_ingredients,
            name_embedding: row
                .get::<Option<Vec<f64>>>("name_embedding")?
                .map(to_f32),
            description_embedding: row
                .get::<Option<Vec<f64>>>("description_embedding")?
                .map(to_f32),
            score: None,
            is_target: false,
            name,
        })
    }

    async fn category_names_inner(&self) -> Result<Vec<String>> {
        let query = Query::new(
            "MATCH (c:Category) WHERE c.name IS NOT NULL \
             RETURN DISTINCT c.name AS name ORDER BY name"
                .to_string(),
        );
        self.fetch_names(query, "categories").await
    }

    async fn name_embeddings_inner(&self, label: NodeLabel) -> Result<Vec<NamedEmbedding>> {
        let query = Query::new(format!(
            "MATCH (n:{}) WHERE n.name_embedding IS NOT NULL
             RETURN n.name AS name, n.name_embedding AS embedding",
            label.as_str()
        ));
        let embeddings = self.fetch_embeddings(query).await?;
        debug!(
            "Loaded {} {} name embeddings",
            embeddings.len(),
            label.as_str()
        );
        Ok(embeddings)
    }

    async fn vector_search_inner(&self, embedding: &[f32], k: usize) -> Result<Vec<ScoredName>> {
        let query = Query::new(
            "CALL db.index.vector.queryNodes($index, $k, $embedding) YIELD node, score
             RETURN node.name AS name, score"
                .to_string(),
        )
        .param("index", self.description_index.clone())
        .param("k", k as i64)
        .param("embedding", to_f64(embedding));

        let mut result = self
            .graph
            .execute(query)
            .await
            .context("Failed to query description vector index")?;

        let mut scored = Vec::new();
        while let Some(row) = result.next().await? {
            let name: String = row.get("name")?;
            let score: f64 = row.get("score")?;
            scored.push(ScoredName::new(name, score as f32));
        }
        Ok(scored)
    }

    async fn cocktail_details_inner(&self, names: &[String]) -> Result<Vec<Candidate>> {
        let query = Query::new(
            "MATCH (c:Cocktail) WHERE c.name IN $names
             OPTIONAL MATCH (c)-[:CATEGORY]->(cat:Category)
             OPTIONAL MATCH (c)-[:HAS_GLASSTYPE]->(g:GlassType)
             OPTIONAL MATCH (c)-[r:HAS_INGREDIENT]->(i:Ingredient)
             WITH c, head(collect(DISTINCT cat.name)) AS category,
                  head(collect(DISTINCT g.name)) AS glass_type,
                  collect(DISTINCT CASE WHEN i IS NULL THEN NULL
                          ELSE [i.name, coalesce(r.measure, 'unknown')] END) AS edges
             RETURN c.name AS name, category, glass_type,
                    c.alcoholic AS alcoholic, c.description AS description,
                    c.instructions AS instructions, c.imageDescription AS image_description,
                    c.ingredients AS ingredients, c.ingredientMeasures AS measures,
                    c.name_embedding AS name_embedding,
                    c.imageDescription_embedding AS description_embedding, edges"
                .to_string(),
        )
        .param("names", names.to_vec());

        let mut result = self
            .graph
            .execute(query)
            .await
            .context("Failed to hydrate cocktails")?;

        let mut by_name: HashMap<String, Candidate> = HashMap::new();
        while let Some(row) = result.next().await? {
            let candidate = Self::candidate_from_row(&row)?;
            by_name.entry(candidate.name.clone()).or_insert(candidate);
        }

        Ok(names.iter().filter_map(|n| by_name.remove(n)).collect())
    }
}

#[async_trait]
impl GraphStore for Neo4jGraphStore {
    async fn category_names(&self) -> barkeep_core::Result<Vec<String>> {
        Ok(self.category_names_inner().await?)
    }

    async fn name_embeddings(
        &self,
        label: NodeLabel,
    ) -> barkeep_core::Result<Vec<NamedEmbedding>> {
        Ok(self.name_embeddings_inner(label).await?)
    }

    async fn find_cocktails_by_name_fragment(
        &self,
        fragment: &str,
        limit: usize,
    ) -> barkeep_core::Result<Vec<String>> {
        let query = Query::new(
            "MATCH (c:Cocktail) WHERE toLower(c.name) CONTAINS toLower($fragment)
             RETURN c.name AS name ORDER BY size(c.name), name LIMIT $limit"
                .to_string(),
        )
        .param("fragment", fragment.trim().to_string())
        .param("limit", limit as i64);
        Ok(self.fetch_names(query, "cocktail names").await?)
    }

    async fn vector_search(
        &self,
        embedding: &[f32],
        k: usize,
    ) -> barkeep_core::Result<Vec<ScoredName>> {
        Ok(self.vector_search_inner(embedding, k).await?)
    }

    async fn description_embeddings(
        &self,
        names: &[String],
    ) -> barkeep_core::Result<HashMap<String, Vec<f32>>> {
        if names.is_empty() {
            return Ok(HashMap::new());
        }
        let query = Query::new(
            "MATCH (c:Cocktail) WHERE c.name IN $names AND c.imageDescription_embedding IS NOT NULL
             RETURN c.name AS name, c.imageDescription_embedding AS embedding"
                .to_string(),
        )
        .param("names", names.to_vec());
        let embeddings = self.fetch_embeddings(query).await?;
        Ok(embeddings
            .into_iter()
            .map(|e| (e.name, e.embedding))
            .collect())
    }

    async fn related_names(
        &self,
        cocktail: &str,
        relationship: Relationship,
    ) -> barkeep_core::Result<Vec<String>> {
        let query = Query::new(format!(
            "MATCH (c:Cocktail {{name: $name}})-[:{}]->(t:{})
             RETURN DISTINCT t.name AS name ORDER BY name",
            relationship.as_str(),
            relationship.target_label().as_str()
        ))
        .param("name", cocktail.to_string());
        Ok(self.fetch_names(query, relationship.as_str()).await?)
    }

    async fn cocktails_related_to(
        &self,
        relationship: Relationship,
        target: &str,
    ) -> barkeep_core::Result<Vec<String>> {
        let query = Query::new(format!(
            "MATCH (c:Cocktail)-[:{}]->(t:{}) WHERE toLower(t.name) = $target
             RETURN DISTINCT c.name AS name ORDER BY name",
            relationship.as_str(),
            relationship.target_label().as_str()
        ))
        .param("target", target.trim().to_lowercase());
        Ok(self.fetch_names(query, relationship.as_str()).await?)
    }

    async fn cocktails_sharing(
        &self,
        relationship: Relationship,
        targets: &[String],
        min_matches: usize,
    ) -> barkeep_core::Result<Vec<MatchCount>> {
        let targets = lowercase_all(targets);
        if targets.is_empty() {
            return Ok(Vec::new());
        }
        let query = Query::new(format!(
            "MATCH (c:Cocktail)-[:{}]->(t:{}) WHERE toLower(t.name) IN $targets
             WITH c, count(DISTINCT toLower(t.name)) AS matches
             WHERE matches >= $min_matches
             RETURN c.name AS name, matches ORDER BY matches DESC, name",
            relationship.as_str(),
            relationship.target_label().as_str()
        ))
        .param("targets", targets)
        .param("min_matches", min_matches as i64);

        Ok(self
            .fetch_counts(query, "matches")
            .await?
            .into_iter()
            .map(|(name, matches)| MatchCount { name, matches })
            .collect())
    }

    async fn cocktails_with_all(
        &self,
        relationship: Relationship,
        targets: &[String],
    ) -> barkeep_core::Result<Vec<String>> {
        let targets = lowercase_all(targets);
        if targets.is_empty() {
            return Ok(Vec::new());
        }
        let required = targets.len() as i64;
        let query = Query::new(format!(
            "MATCH (c:Cocktail)-[:{}]->(t:{}) WHERE toLower(t.name) IN $targets
             WITH c, count(DISTINCT toLower(t.name)) AS matches
             WHERE matches = $required
             RETURN c.name AS name ORDER BY name",
            relationship.as_str(),
            relationship.target_label().as_str()
        ))
        .param("targets", targets)
        .param("required", required);
        Ok(self.fetch_names(query, relationship.as_str()).await?)
    }

    async fn ingredient_counts(
        &self,
        names: &[String],
    ) -> barkeep_core::Result<HashMap<String, usize>> {
        if names.is_empty() {
            return Ok(HashMap::new());
        }
        let query = Query::new(
            "MATCH (c:Cocktail) WHERE c.name IN $names
             OPTIONAL MATCH (c)-[:HAS_INGREDIENT]->(i:Ingredient)
             RETURN c.name AS name, count(DISTINCT i) AS count"
                .to_string(),
        )
        .param("names", names.to_vec());

        Ok(self
            .fetch_counts(query, "count")
            .await?
            .into_iter()
            .collect())
    }

    async fn cocktail_details(&self, names: &[String]) -> barkeep_core::Result<Vec<Candidate>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.cocktail_details_inner(names).await?)
    }
}
