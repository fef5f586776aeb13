//! Plain-text rendering of command results

use barkeep_core::{Candidate, TaskClassification};
use barkeep_refinement::{RefinementOutcome, RoundResult};
use std::fmt::Write;

/// Best round, baseline and history of a completed run
pub fn render_outcome(outcome: &RefinementOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Query: {}", outcome.query);
    let _ = writeln!(out, "{}", render_classification(&outcome.classification));
    out.push('\n');

    render_round(&mut out, "Best result", &outcome.best);
    if outcome.best.round != outcome.initial.round {
        out.push('\n');
        render_round(&mut out, "Baseline", &outcome.initial);
        let _ = writeln!(
            out,
            "Improvement over baseline: {:+.1}",
            outcome.best.aggregate - outcome.initial.aggregate
        );
    }

    out.push_str("\nRound history:\n");
    for summary in &outcome.history {
        let _ = writeln!(
            out,
            "  round {} | breadth {} | {} candidates | {} | score {:.1}{}",
            summary.round,
            summary.breadth,
            summary.candidate_count,
            summary.retrieval_mode,
            summary.aggregate,
            if summary.should_retry { "" } else { " (stop)" }
        );
    }
    let _ = write!(out, "Finished in {} ms", outcome.elapsed_ms);
    out
}

fn render_round(out: &mut String, title: &str, round: &RoundResult) {
    let scores = &round.assessment.scores;
    let _ = writeln!(
        out,
        "{title}: round {} (breadth {}), score {:.1}",
        round.round, round.breadth, round.aggregate
    );
    let _ = writeln!(
        out,
        "  relevance {:.0}, diversity {:.0}, completeness {:.0}, coherence {:.0}",
        scores.relevance, scores.diversity, scores.completeness, scores.coherence
    );
    for (i, candidate) in round.candidates.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, candidate_line(candidate));
    }
    if !round.assessment.feedback.is_empty() {
        let _ = writeln!(out, "  Feedback: {}", round.assessment.feedback);
    }
}

fn candidate_line(candidate: &Candidate) -> String {
    let mut line = candidate.name.clone();
    if candidate.is_target {
        line.push_str(" (target)");
    }
    if let Some(glass) = &candidate.glass_type {
        let _ = write!(line, " [{glass}]");
    }
    if !candidate.ingredients.is_empty() {
        let _ = write!(line, ": {}", candidate.ingredients.join(", "));
    }
    line
}

pub fn render_classification(classification: &TaskClassification) -> String {
    format!(
        "Strategy {} ({}), confidence {:.0}: {}",
        classification.strategy,
        classification.strategy.description(),
        classification.confidence,
        classification.reason
    )
}

pub fn render_categories(categories: &[String]) -> String {
    if categories.is_empty() {
        return "No categories found.".to_string();
    }
    categories.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use barkeep_core::{QualityAssessment, QualityScores, StrategyId};
    use barkeep_refinement::RetrievalMode;
    use barkeep_retrieval::KeywordSet;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn round(round: usize, aggregate: f32, names: &[&str]) -> RoundResult {
        RoundResult {
            round,
            breadth: 2 + round,
            candidates: names.iter().map(|n| Candidate::named(*n)).collect(),
            assessment: QualityAssessment {
                scores: QualityScores::new(aggregate, aggregate, aggregate, aggregate),
                feedback: String::new(),
                suggestions: Vec::new(),
            },
            aggregate,
            should_retry: aggregate < 80.0,
            retrieval_mode: if round == 1 {
                RetrievalMode::Full
            } else {
                RetrievalMode::Cached
            },
        }
    }

    fn outcome(
        initial: RoundResult,
        best: RoundResult,
        history: Vec<RoundResult>,
    ) -> RefinementOutcome {
        RefinementOutcome {
            run_id: Uuid::nil(),
            query: "bourbon drinks".to_string(),
            classification: TaskClassification::forced(StrategyId::MultiHop),
            keywords: KeywordSet::empty(StrategyId::MultiHop),
            initial,
            best,
            history: history.iter().map(RoundResult::summary).collect(),
            elapsed_ms: 12,
        }
    }

    #[test]
    fn test_render_classification() {
        let classification = TaskClassification::fallback("classification failed: timeout");
        let rendered = render_classification(&classification);
        assert!(rendered.starts_with("Strategy C1 ("));
        assert!(rendered.ends_with("confidence 0: classification failed: timeout"));
    }

    #[test]
    fn test_render_outcome_single_round_has_no_baseline() {
        let first = round(1, 85.0, &["Manhattan", "Old Fashioned"]);
        let rendered = render_outcome(&outcome(first.clone(), first.clone(), vec![first]));

        assert!(rendered.contains("Best result: round 1 (breadth 3), score 85.0"));
        assert!(rendered.contains("  1. Manhattan\n  2. Old Fashioned\n"));
        assert!(!rendered.contains("Baseline"));
        assert!(rendered.contains("round 1 | breadth 3 | 2 candidates | full | score 85.0 (stop)"));
        assert!(rendered.ends_with("Finished in 12 ms"));
    }

    #[test]
    fn test_render_outcome_reports_improvement() {
        let first = round(1, 60.0, &["Manhattan"]);
        let second = round(2, 72.5, &["Manhattan", "Rob Roy"]);
        let rendered = render_outcome(&outcome(
            first.clone(),
            second.clone(),
            vec![first, second],
        ));

        assert!(rendered.contains("Best result: round 2 (breadth 4), score 72.5"));
        assert!(rendered.contains("Baseline: round 1 (breadth 3), score 60.0"));
        assert!(rendered.contains("Improvement over baseline: +12.5"));
        assert!(rendered.contains("round 2 | breadth 4 | 2 candidates | cached | score 72.5\n"));
    }

    #[test]
    fn test_candidate_line_marks_target() {
        let mut candidate = Candidate::named("Manhattan");
        candidate.is_target = true;
        candidate.glass_type = Some("Cocktail glass".to_string());
        candidate.ingredients = vec!["Bourbon".to_string(), "Sweet Vermouth".to_string()];

        assert_eq!(
            candidate_line(&candidate),
            "Manhattan (target) [Cocktail glass]: Bourbon, Sweet Vermouth"
        );
    }

    #[test]
    fn test_render_categories() {
        assert_eq!(render_categories(&[]), "No categories found.");
        assert_eq!(
            render_categories(&["Cocktail".to_string(), "Shot".to_string()]),
            "Cocktail\nShot"
        );
    }
}
