//! Iterative retrieve-and-score refinement for cocktail queries
//!
//! [`RefinementLoop`] classifies a query once, resolves its keywords once, and
//! then runs up to three rounds of retrieval at growing breadth, scoring each
//! round and keeping the best. Full rankings are cached per query and
//! strategy so later rounds slice instead of recomputing.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod cache;
mod error;
mod format;
mod orchestrator;
mod types;

pub use cache::RankingCache;
pub use error::{RefinementError, Result};
pub use format::format_candidates;
pub use orchestrator::RefinementLoop;
pub use types::{
    RefinementOutcome, RefinementRequest, RetrievalMode, RoundResult, RoundSummary,
    MAX_QUERY_LENGTH,
};
