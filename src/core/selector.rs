use crate::core::scoring::total_score;
use crate::models::{
    FieldScore, MatchResult, NormalizedAttributes, ScoredCandidate, ScoringWeights,
};

/// Pick the best candidate and express its total as a confidence.
///
/// Tie-breaks, in order: more matched fields, higher index-native
/// relevance, lexicographically smaller id. The last one makes the
/// selection fully reproducible.
///
/// Confidence is total score over the maximum achievable given the
/// fields actually present on the input side, so a caller supplying
/// only a website can still reach 1.0.
pub fn select(
    normalized: &NormalizedAttributes,
    scored: Vec<(ScoredCandidate, Vec<FieldScore>)>,
    weights: &ScoringWeights,
) -> MatchResult {
    let max_possible: f64 = normalized
        .present_fields()
        .iter()
        .map(|f| weights.for_field(*f))
        .sum();

    let mut ranked: Vec<(ScoredCandidate, Vec<FieldScore>, f64)> = scored
        .into_iter()
        .map(|(candidate, scores)| {
            let total = total_score(&scores);
            (candidate, scores, total)
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.2.partial_cmp(&a.2)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                let matched_a = a.1.iter().filter(|s| s.value > 0.0).count();
                let matched_b = b.1.iter().filter(|s| s.value > 0.0).count();
                matched_b.cmp(&matched_a)
            })
            .then_with(|| {
                b.0.relevance
                    .partial_cmp(&a.0.relevance)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.0.record.company_id.cmp(&b.0.record.company_id))
    });

    match ranked.into_iter().next() {
        Some((candidate, scores, total)) if total > 0.0 => {
            let matched_fields = scores
                .iter()
                .filter(|s| s.value > 0.0)
                .map(|s| s.field)
                .collect();

            let confidence = if max_possible > 0.0 {
                (total / max_possible).clamp(0.0, 1.0)
            } else {
                0.0
            };

            MatchResult {
                candidate_id: Some(candidate.record.company_id.clone()),
                total_score: total,
                confidence,
                matched_fields,
                candidate: Some(candidate.record),
            }
        }
        _ => MatchResult::no_match(),
    }
}
