//! Full rankings cached across the rounds of one loop

use barkeep_core::{ScoredName, StrategyId};
use std::collections::HashMap;
use tracing::debug;

/// Full scored rankings keyed by query text and strategy
///
/// A cache lives for one refinement loop and is dropped with it.
#[derive(Debug, Default)]
pub struct RankingCache {
    rankings: HashMap<(String, StrategyId), Vec<ScoredName>>,
}

impl RankingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a ranking; an existing entry for the same key is kept
    pub fn insert(&mut self, query: &str, strategy: StrategyId, ranking: Vec<ScoredName>) {
        if ranking.is_empty() {
            return;
        }
        self.rankings
            .entry((query.to_string(), strategy))
            .or_insert_with(|| {
                debug!("Caching full ranking of {} names for {strategy}", ranking.len());
                ranking
            });
    }

    pub fn contains(&self, query: &str, strategy: StrategyId) -> bool {
        self.rankings.contains_key(&(query.to_string(), strategy))
    }

    /// First `breadth` entries of the cached ranking
    pub fn slice(
        &self,
        query: &str,
        strategy: StrategyId,
        breadth: usize,
    ) -> Option<&[ScoredName]> {
        self.rankings
            .get(&(query.to_string(), strategy))
            .map(|ranking| &ranking[..breadth.min(ranking.len())])
    }

    pub fn len(&self) -> usize {
        self.rankings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rankings.is_empty()
    }
}
