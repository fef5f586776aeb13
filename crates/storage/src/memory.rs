//! In-memory graph for tests
//!
//! Mirrors the semantics of the Neo4j queries closely enough that strategies
//! can be exercised without a database. Vector search scores follow the Neo4j
//! cosine index convention of `(1 + cosine) / 2`.

use async_trait::async_trait;
use barkeep_core::{Candidate, Result, ScoredName};
use std::collections::{HashMap, HashSet};

use crate::error::StorageError;
use crate::schema::{NodeLabel, Relationship};
use crate::serialized::{parse_or_empty, recipe_lines, UNKNOWN_MEASURE};
use crate::{GraphStore, MatchCount, NamedEmbedding};

/// A cocktail node and its outgoing edges
#[derive(Debug, Clone, Default)]
pub struct CocktailFixture {
    name: String,
    category: Option<String>,
    glass_type: Option<String>,
    alcoholic: Option<String>,
    description: Option<String>,
    instructions: Option<String>,
    image_description: Option<String>,
    edges: Vec<(String, Option<String>)>,
    serialized_ingredients: Option<String>,
    serialized_measures: Option<String>,
    name_embedding: Option<Vec<f32>>,
    description_embedding: Option<Vec<f32>>,
}

impl CocktailFixture {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn glass(mut self, glass: impl Into<String>) -> Self {
        self.glass_type = Some(glass.into());
        self
    }

    pub fn alcoholic(mut self, alcoholic: impl Into<String>) -> Self {
        self.alcoholic = Some(alcoholic.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn image_description(mut self, text: impl Into<String>) -> Self {
        self.image_description = Some(text.into());
        self
    }

    /// Adds a HAS_INGREDIENT edge with a measure
    pub fn ingredient(mut self, name: impl Into<String>, measure: impl Into<String>) -> Self {
        self.edges.push((name.into(), Some(measure.into())));
        self
    }

    /// Adds several HAS_INGREDIENT edges without measures
    pub fn ingredients<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.edges
            .extend(names.into_iter().map(|n| (n.into(), None)));
        self
    }

    /// Sets the raw serialized `ingredients` and `ingredientMeasures` properties
    pub fn serialized(
        mut self,
        ingredients: impl Into<String>,
        measures: impl Into<String>,
    ) -> Self {
        self.serialized_ingredients = Some(ingredients.into());
        self.serialized_measures = Some(measures.into());
        self
    }

    pub fn name_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.name_embedding = Some(embedding);
        self
    }

    pub fn description_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.description_embedding = Some(embedding);
        self
    }

    fn targets(&self, relationship: Relationship) -> Vec<String> {
        match relationship {
            Relationship::HasIngredient => {
                let mut seen = HashSet::new();
                self.edges
                    .iter()
                    .filter(|(name, _)| seen.insert(name.clone()))
                    .map(|(name, _)| name.clone())
                    .collect()
            }
            Relationship::Category => self.category.iter().cloned().collect(),
            Relationship::HasGlassType => self.glass_type.iter().cloned().collect(),
        }
    }

    fn lowered_targets(&self, relationship: Relationship) -> HashSet<String> {
        self.targets(relationship)
            .iter()
            .map(|t| t.to_lowercase())
            .collect()
    }

    fn hydrate(&self) -> Candidate {
        let ingredients = parse_or_empty(
            &self.name,
            "ingredients",
            self.serialized_ingredients.as_deref(),
        );
        let measures = parse_or_empty(
            &self.name,
            "ingredientMeasures",
            self.serialized_measures.as_deref(),
        );
        let mut recipe = recipe_lines(&ingredients, &measures);
        if recipe.is_empty() {
            let (names, measures): (Vec<String>, Vec<String>) = self
                .edges
                .iter()
                .map(|(name, measure)| {
                    (
                        name.clone(),
                        measure.clone().unwrap_or_else(|| UNKNOWN_MEASURE.to_string()),
                    )
                })
                .unzip();
            recipe = recipe_lines(&names, &measures);
        }

        Candidate {
            name: self.name.clone(),
            category: self.category.clone(),
            glass_type: self.glass_type.clone(),
            alcoholic: self.alcoholic.clone(),
            description: self.description.clone(),
            instructions: self.instructions.clone(),
            image_description: self.image_description.clone(),
            recipe,
            ingredients: self.targets(Relationship::HasIngredient),
            name_embedding: self.name_embedding.clone(),
            description_embedding: self.description_embedding.clone(),
            score: None,
            is_target: false,
        }
    }
}

/// Fixture-driven [`GraphStore`]
#[derive(Debug, Clone, Default)]
pub struct InMemoryGraph {
    cocktails: Vec<CocktailFixture>,
    categories: Vec<String>,
    node_embeddings: HashMap<NodeLabel, Vec<NamedEmbedding>>,
    failing: bool,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// A graph whose every query fails
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    pub fn with_cocktail(mut self, cocktail: CocktailFixture) -> Self {
        self.cocktails.push(cocktail);
        self
    }

    /// Registers a category node even if no cocktail uses it
    pub fn with_category(mut self, name: impl Into<String>) -> Self {
        self.categories.push(name.into());
        self
    }

    /// Stores a name embedding for an ingredient, category or glass node
    pub fn with_name_embedding(
        mut self,
        label: NodeLabel,
        name: impl Into<String>,
        embedding: Vec<f32>,
    ) -> Self {
        self.node_embeddings
            .entry(label)
            .or_default()
            .push(NamedEmbedding {
                name: name.into(),
                embedding,
            });
        self
    }

    fn check(&self) -> Result<()> {
        if self.failing {
            return Err(StorageError::BackendError("graph unavailable".to_string()).into());
        }
        Ok(())
    }

    fn cocktail(&self, name: &str) -> Option<&CocktailFixture> {
        self.cocktails.iter().find(|c| c.name == name)
    }

    fn sorted_names<'a>(names: impl Iterator<Item = &'a CocktailFixture>) -> Vec<String> {
        let mut names: Vec<String> = names.map(|c| c.name.clone()).collect();
        names.sort();
        names.dedup();
        names
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

fn lowered_set(values: &[String]) -> HashSet<String> {
    values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

#[async_trait]
impl GraphStore for InMemoryGraph {
    async fn category_names(&self) -> Result<Vec<String>> {
        self.check()?;
        let mut names: Vec<String> = self
            .categories
            .iter()
            .cloned()
            .chain(self.cocktails.iter().filter_map(|c| c.category.clone()))
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    async fn name_embeddings(&self, label: NodeLabel) -> Result<Vec<NamedEmbedding>> {
        self.check()?;
        if label == NodeLabel::Cocktail {
            return Ok(self
                .cocktails
                .iter()
                .filter_map(|c| {
                    c.name_embedding.clone().map(|embedding| NamedEmbedding {
                        name: c.name.clone(),
                        embedding,
                    })
                })
                .collect());
        }
        Ok(self.node_embeddings.get(&label).cloned().unwrap_or_default())
    }

    async fn find_cocktails_by_name_fragment(
        &self,
        fragment: &str,
        limit: usize,
    ) -> Result<Vec<String>> {
        self.check()?;
        let needle = fragment.trim().to_lowercase();
        let mut matches: Vec<&CocktailFixture> = self
            .cocktails
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .collect();
        matches.sort_by(|a, b| a.name.len().cmp(&b.name.len()).then(a.name.cmp(&b.name)));
        Ok(matches
            .into_iter()
            .take(limit)
            .map(|c| c.name.clone())
            .collect())
    }

    async fn vector_search(&self, embedding: &[f32], k: usize) -> Result<Vec<ScoredName>> {
        self.check()?;
        let mut scored: Vec<ScoredName> = self
            .cocktails
            .iter()
            .filter_map(|c| {
                c.description_embedding
                    .as_ref()
                    .map(|d| ScoredName::new(c.name.clone(), (1.0 + cosine(embedding, d)) / 2.0))
            })
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.name.cmp(&b.name)));
        scored.truncate(k);
        Ok(scored)
    }

    async fn description_embeddings(
        &self,
        names: &[String],
    ) -> Result<HashMap<String, Vec<f32>>> {
        self.check()?;
        Ok(names
            .iter()
            .filter_map(|n| {
                self.cocktail(n)
                    .and_then(|c| c.description_embedding.clone())
                    .map(|e| (n.clone(), e))
            })
            .collect())
    }

    async fn related_names(
        &self,
        cocktail: &str,
        relationship: Relationship,
    ) -> Result<Vec<String>> {
        self.check()?;
        let mut names = self
            .cocktail(cocktail)
            .map(|c| c.targets(relationship))
            .unwrap_or_default();
        names.sort();
        names.dedup();
        Ok(names)
    }

    async fn cocktails_related_to(
        &self,
        relationship: Relationship,
        target: &str,
    ) -> Result<Vec<String>> {
        self.check()?;
        let target = target.trim().to_lowercase();
        Ok(Self::sorted_names(
            self.cocktails
                .iter()
                .filter(|c| c.lowered_targets(relationship).contains(&target)),
        ))
    }

    async fn cocktails_sharing(
        &self,
        relationship: Relationship,
        targets: &[String],
        min_matches: usize,
    ) -> Result<Vec<MatchCount>> {
        self.check()?;
        let wanted = lowered_set(targets);
        if wanted.is_empty() {
            return Ok(Vec::new());
        }
        let mut counts: Vec<MatchCount> = self
            .cocktails
            .iter()
            .map(|c| MatchCount {
                name: c.name.clone(),
                matches: c.lowered_targets(relationship).intersection(&wanted).count(),
            })
            .filter(|m| m.matches > 0 && m.matches >= min_matches)
            .collect();
        counts.sort_by(|a, b| b.matches.cmp(&a.matches).then(a.name.cmp(&b.name)));
        Ok(counts)
    }

    async fn cocktails_with_all(
        &self,
        relationship: Relationship,
        targets: &[String],
    ) -> Result<Vec<String>> {
        self.check()?;
        let wanted = lowered_set(targets);
        if wanted.is_empty() {
            return Ok(Vec::new());
        }
        Ok(Self::sorted_names(self.cocktails.iter().filter(|c| {
            wanted.is_subset(&c.lowered_targets(relationship))
        })))
    }

    async fn ingredient_counts(&self, names: &[String]) -> Result<HashMap<String, usize>> {
        self.check()?;
        Ok(names
            .iter()
            .filter_map(|n| {
                self.cocktail(n).map(|c| {
                    (
                        n.clone(),
                        c.lowered_targets(Relationship::HasIngredient).len(),
                    )
                })
            })
            .collect())
    }

    async fn cocktail_details(&self, names: &[String]) -> Result<Vec<Candidate>> {
        self.check()?;
        Ok(names
            .iter()
            .filter_map(|n| self.cocktail(n).map(CocktailFixture::hydrate))
            .collect())
    }
}
