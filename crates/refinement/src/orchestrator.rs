//! Refinement loop: classify once, then retrieve and score up to `max_rounds` times

use crate::{
    cache::RankingCache,
    error::{RefinementError, Result},
    format::format_candidates,
    types::{RefinementOutcome, RefinementRequest, RetrievalMode, RoundResult, RoundSummary},
};
use barkeep_core::config::RefinementConfig;
use barkeep_core::{Candidate, QualityAssessment, QualityScores, StrategyId, TaskClassification};
use barkeep_llm::{ImageDescriber, ScoringService, TaskClassifier};
use barkeep_retrieval::{
    hydrate_scored, KeywordResolver, KeywordSet, RetrievalRequest, RetrievalStrategy,
    StrategyRegistry,
};
use barkeep_storage::GraphStore;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Loop-wide state for one query: strategy, keywords and cache never change mid-loop
struct LoopRun<'a> {
    query: &'a str,
    strategy: Arc<dyn RetrievalStrategy>,
    keywords: &'a KeywordSet,
    cache: RankingCache,
}

#[derive(Default)]
struct Rounds {
    initial: Option<RoundResult>,
    best: Option<RoundResult>,
    history: Vec<RoundSummary>,
}

pub struct RefinementLoop {
    registry: StrategyRegistry,
    resolver: Arc<KeywordResolver>,
    classifier: Arc<dyn TaskClassifier>,
    scoring: Arc<dyn ScoringService>,
    store: Arc<dyn GraphStore>,
    image_describer: Option<Arc<dyn ImageDescriber>>,
    config: RefinementConfig,
}

impl std::fmt::Debug for RefinementLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefinementLoop")
            .field("strategies", &self.registry.len())
            .field("image_describer", &self.image_describer.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl RefinementLoop {
    pub fn new(
        registry: StrategyRegistry,
        resolver: Arc<KeywordResolver>,
        classifier: Arc<dyn TaskClassifier>,
        scoring: Arc<dyn ScoringService>,
        store: Arc<dyn GraphStore>,
        config: RefinementConfig,
    ) -> Self {
        Self {
            registry,
            resolver,
            classifier,
            scoring,
            store,
            image_describer: None,
            config,
        }
    }

    /// Enables image references on requests
    pub fn with_image_describer(mut self, describer: Arc<dyn ImageDescriber>) -> Self {
        self.image_describer = Some(describer);
        self
    }

    /// Breadth of a 1-based round
    pub fn breadth_for_round(&self, round: usize) -> usize {
        self.config.initial_breadth + round.saturating_sub(1) * self.config.breadth_step
    }

    /// Runs the loop to completion
    ///
    /// # Errors
    /// `InvalidRequest` for an empty or over-long query, `StrategyUnavailable`
    /// when the registry lacks the chosen strategy, and `NoResults` when every
    /// round retrieved nothing.
    pub async fn run(&self, request: RefinementRequest) -> Result<RefinementOutcome> {
        request.validate()?;
        let start_time = Instant::now();
        let run_id = Uuid::new_v4();

        let query = self.effective_query(&request).await;
        if query.trim().is_empty() {
            return Err(RefinementError::InvalidRequest(
                "Query cannot be empty".to_string(),
            ));
        }
        info!("Starting refinement run {run_id}: {query}");

        let classification = self.classification(&query, request.strategy).await;
        let strategy_id = classification.strategy;
        info!(
            "Strategy {strategy_id} ({}) with confidence {:.0}: {}",
            strategy_id.description(),
            classification.confidence,
            classification.reason
        );

        let strategy = self
            .registry
            .get(strategy_id)
            .ok_or(RefinementError::StrategyUnavailable(strategy_id))?;
        let keywords = self.resolver.resolve(strategy_id, &query).await;
        debug!("Resolved keywords: {keywords:?}");

        let rounds = self.run_rounds(&query, strategy, &keywords).await;

        if rounds.history.iter().all(|r| r.candidate_count == 0) {
            warn!("No candidates in any of {} rounds", rounds.history.len());
            return Err(RefinementError::NoResults {
                rounds: rounds.history.len(),
            });
        }
        let (Some(initial), Some(best)) = (rounds.initial, rounds.best) else {
            return Err(RefinementError::NoResults {
                rounds: rounds.history.len(),
            });
        };

        info!(
            "Best result from round {} (breadth {}, score {:.1})",
            best.round, best.breadth, best.aggregate
        );

        Ok(RefinementOutcome {
            run_id,
            query,
            classification,
            keywords,
            initial,
            best,
            history: rounds.history,
            elapsed_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    async fn run_rounds(
        &self,
        query: &str,
        strategy: Arc<dyn RetrievalStrategy>,
        keywords: &KeywordSet,
    ) -> Rounds {
        let mut run = LoopRun {
            query,
            strategy,
            keywords,
            cache: RankingCache::new(),
        };
        let mut rounds = Rounds::default();
        let max_rounds = self.config.max_rounds.max(1);

        for round in 1..=max_rounds {
            let breadth = self.breadth_for_round(round);
            info!("Round {round}/{max_rounds} (breadth {breadth})");

            let result = self.run_round(&mut run, round, breadth).await;
            rounds.history.push(result.summary());
            info!(
                "Round {round} scored {:.1} with {} candidates ({})",
                result.aggregate,
                result.candidates.len(),
                result.retrieval_mode
            );

            let stop = !result.should_retry;
            if rounds.initial.is_none() {
                rounds.initial = Some(result.clone());
            }
            // Ties go to the later, broader round
            if rounds
                .best
                .as_ref()
                .is_none_or(|best| result.aggregate >= best.aggregate)
            {
                rounds.best = Some(result);
            }

            if stop {
                info!("Stop score reached in round {round}");
                break;
            }
        }
        rounds
    }

    /// Request text with any image description prepended
    async fn effective_query(&self, request: &RefinementRequest) -> String {
        let text = request.query.trim();
        let (Some(image), Some(describer)) = (&request.image, &self.image_describer) else {
            if request.image.is_some() {
                warn!("Image reference ignored: no image describer configured");
            }
            return text.to_string();
        };

        match describer.describe(image).await {
            Ok(description) if !description.trim().is_empty() => {
                debug!("Image description: {description}");
                if text.is_empty() {
                    description.trim().to_string()
                } else {
                    format!("{} {text}", description.trim())
                }
            }
            Ok(_) => {
                warn!("Image description was empty, using text only");
                text.to_string()
            }
            Err(e) => {
                warn!("Image description failed, using text only: {e}");
                text.to_string()
            }
        }
    }

    async fn classification(&self, query: &str, forced: Option<StrategyId>) -> TaskClassification {
        if let Some(strategy) = forced {
            return TaskClassification::forced(strategy);
        }
        match self.classifier.classify(query).await {
            Ok(classification) => classification,
            Err(e) => {
                warn!("Task classification failed, using default strategy: {e}");
                TaskClassification::fallback(format!("classification failed: {e}"))
            }
        }
    }

    async fn run_round(&self, run: &mut LoopRun<'_>, round: usize, breadth: usize) -> RoundResult {
        let (candidates, retrieval_mode) = self.retrieve(run, round, breadth).await;
        let assessment = self.score(run.query, &candidates).await;
        let aggregate = assessment.scores.aggregate();

        RoundResult {
            round,
            breadth,
            candidates,
            should_retry: aggregate < self.config.stop_score,
            aggregate,
            assessment,
            retrieval_mode,
        }
    }

    /// Cached slice when a full ranking exists, otherwise a strategy call
    async fn retrieve(
        &self,
        run: &mut LoopRun<'_>,
        round: usize,
        breadth: usize,
    ) -> (Vec<Candidate>, RetrievalMode) {
        let strategy_id = run.strategy.id();

        if let Some(ranked) = run.cache.slice(run.query, strategy_id, breadth) {
            debug!("Cache hit for {strategy_id}: slicing {} names", ranked.len());
            let candidates = match hydrate_scored(self.store.as_ref(), ranked).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    warn!("Hydrating cached ranking failed: {e}");
                    Vec::new()
                }
            };
            return (candidates, RetrievalMode::Cached);
        }

        let mode = if round == 1 {
            RetrievalMode::Full
        } else {
            debug!("No cached ranking for {strategy_id}, recomputing");
            RetrievalMode::Recomputed
        };

        let request = RetrievalRequest::new(run.query, run.keywords.clone(), breadth);
        match run.strategy.retrieve(&request).await {
            Ok(output) => {
                if output.cacheable {
                    run.cache.insert(run.query, strategy_id, output.ranking);
                }
                (output.current_slice, mode)
            }
            Err(e) => {
                warn!("Strategy {strategy_id} failed, treating round as empty: {e}");
                (Vec::new(), mode)
            }
        }
    }

    async fn score(&self, query: &str, candidates: &[Candidate]) -> QualityAssessment {
        if candidates.is_empty() {
            return QualityAssessment {
                scores: QualityScores::zero(),
                feedback: "No candidates were retrieved.".to_string(),
                suggestions: Vec::new(),
            };
        }

        let formatted = format_candidates(candidates);
        match self
            .scoring
            .score(query, &formatted, candidates.len())
            .await
        {
            Ok(assessment) => assessment,
            Err(e) => {
                warn!("Scoring failed, using neutral scores: {e}");
                QualityAssessment::neutral(format!("scoring failed: {e}"))
            }
        }
    }
}
