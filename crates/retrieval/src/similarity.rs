//! Cosine similarity and score ordering shared by every strategy

use barkeep_core::ScoredName;
use std::cmp::Ordering;

/// Cosine similarity in [-1, 1]
///
/// Empty, mismatched or zero-norm vectors score 0 rather than failing, so a
/// zero-vector embedding fallback ranks last without being excluded.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let similarity = dot / (norm_a * norm_b);
    if similarity.is_finite() {
        similarity.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Sort scored names descending, NaN last; equal scores keep input order
pub fn sort_scores_descending(scored: &mut [ScoredName]) {
    scored.sort_by(|a, b| match (a.score.is_nan(), b.score.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal),
    });
}

/// Scores each named vector against `query` and returns them best first
///
/// Items without a vector score 0.
pub fn rank_by_similarity<'a, I>(query: &[f32], items: I) -> Vec<ScoredName>
where
    I: IntoIterator<Item = (&'a str, Option<&'a [f32]>)>,
{
    let mut scored: Vec<ScoredName> = items
        .into_iter()
        .map(|(name, vector)| {
            ScoredName::new(
                name,
                vector.map_or(0.0, |v| cosine_similarity(query, v)),
            )
        })
        .collect();
    sort_scores_descending(&mut scored);
    scored
}
