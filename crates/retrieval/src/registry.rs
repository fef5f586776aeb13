//! Strategy registry
//!
//! Built once at start-up and passed by reference into each request, so
//! tests can register fake strategies in place of the graph-backed ones.

use crate::strategies::{
    AlternativeStrategy, GlassProgressiveStrategy, MultiHopStrategy, StrategyContext,
    VisualIngredientStrategy,
};
use crate::strategy::RetrievalStrategy;
use barkeep_core::StrategyId;
use std::collections::HashMap;
use std::sync::Arc;

/// One strategy instance per [`StrategyId`]
#[derive(Default, Clone)]
pub struct StrategyRegistry {
    strategies: HashMap<StrategyId, Arc<dyn RetrievalStrategy>>,
}

impl StrategyRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the four graph-backed strategies over one context
    pub fn with_defaults(ctx: StrategyContext) -> Self {
        Self::new()
            .register(Arc::new(VisualIngredientStrategy::new(ctx.clone())))
            .register(Arc::new(GlassProgressiveStrategy::new(ctx.clone())))
            .register(Arc::new(MultiHopStrategy::new(ctx.clone())))
            .register(Arc::new(AlternativeStrategy::new(ctx)))
    }

    /// Adds a strategy, replacing any registered under the same id
    pub fn register(mut self, strategy: Arc<dyn RetrievalStrategy>) -> Self {
        self.strategies.insert(strategy.id(), strategy);
        self
    }

    pub fn get(&self, id: StrategyId) -> Option<Arc<dyn RetrievalStrategy>> {
        self.strategies.get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}
