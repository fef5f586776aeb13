//! The contract shared by the four retrieval strategies

use crate::keywords::KeywordSet;
use async_trait::async_trait;
use barkeep_core::error::Result;
use barkeep_core::{Candidate, ScoredName, StrategyId};
use serde::{Deserialize, Serialize};

/// One retrieve call: the query, its resolved keywords and the breadth to return
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalRequest {
    pub query: String,
    pub keywords: KeywordSet,
    pub breadth: usize,
}

impl RetrievalRequest {
    pub fn new(query: impl Into<String>, keywords: KeywordSet, breadth: usize) -> Self {
        Self {
            query: query.into(),
            keywords,
            breadth,
        }
    }
}

/// Result of one retrieve call
///
/// `ranking` is the complete scored ranking a later round may slice instead
/// of recomputing. A strategy that cannot support that returns it empty with
/// `cacheable` false.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalOutput {
    pub ranking: Vec<ScoredName>,
    pub current_slice: Vec<Candidate>,
    pub breadth: usize,
    pub cacheable: bool,
}

impl RetrievalOutput {
    /// Nothing found
    pub fn empty(breadth: usize) -> Self {
        Self {
            ranking: Vec::new(),
            current_slice: Vec::new(),
            breadth,
            cacheable: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current_slice.is_empty()
    }

    /// Names of the full ranking, best first
    pub fn ranked_full_names(&self) -> Vec<String> {
        self.ranking.iter().map(|scored| scored.name.clone()).collect()
    }
}

#[async_trait]
pub trait RetrievalStrategy: Send + Sync {
    fn id(&self) -> StrategyId;

    /// Computes the full ranking for the request and hydrates its
    /// breadth-limited prefix
    async fn retrieve(&self, request: &RetrievalRequest) -> Result<RetrievalOutput>;
}
