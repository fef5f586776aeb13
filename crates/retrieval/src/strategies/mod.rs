//! The four retrieval strategies
//!
//! Every strategy reads its own [`KeywordSet`](crate::keywords::KeywordSet)
//! variant. A keyword set of another variant, or one with every field empty,
//! sends the strategy to a nearest-neighbour search over cocktail names. The
//! visual strategy is the exception for empty sets: its description search
//! runs without keywords.

mod alternative;
mod common;
mod glass;
mod multi_hop;
mod visual;

pub use alternative::AlternativeStrategy;
pub use common::{hydrate_scored, StrategyContext};
pub use glass::GlassProgressiveStrategy;
pub use multi_hop::MultiHopStrategy;
pub use visual::VisualIngredientStrategy;
