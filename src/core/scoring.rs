use crate::core::normalize::name_key;
use crate::core::similarity::name_score;
use crate::models::{CompanyRecord, FieldKind, FieldScore, NormalizedAttributes, ScoringWeights};

/// Score one candidate against the normalized input, one FieldScore
/// per field kind in priority order.
///
/// Pure and deterministic. A field that is empty on either side
/// contributes zero; absence is neutral, never a penalty.
pub fn score_candidate(
    normalized: &NormalizedAttributes,
    record: &CompanyRecord,
    weights: &ScoringWeights,
    name_distance_threshold: f64,
) -> Vec<FieldScore> {
    let domain = exact_score(
        &normalized.domain,
        !record.domain.is_empty() && record.domain == normalized.domain,
        weights.domain,
    );

    let phone = exact_score(
        &normalized.phone_digits,
        record
            .phones_normalized
            .iter()
            .any(|p| p == &normalized.phone_digits),
        weights.phone,
    );

    let facebook = exact_score(
        &normalized.facebook_id,
        record
            .facebook_links_normalized
            .iter()
            .any(|f| f == &normalized.facebook_id),
        weights.facebook,
    );

    let name_value = best_name_score(normalized, record, weights, name_distance_threshold);

    vec![
        FieldScore { field: FieldKind::Domain, value: domain.0, matched: domain.1 },
        FieldScore { field: FieldKind::Phone, value: phone.0, matched: phone.1 },
        FieldScore { field: FieldKind::Facebook, value: facebook.0, matched: facebook.1 },
        FieldScore {
            field: FieldKind::Name,
            value: name_value,
            matched: name_value > 0.0,
        },
    ]
}

#[inline]
fn exact_score(input: &str, matched: bool, weight: f64) -> (f64, bool) {
    if input.is_empty() || !matched {
        (0.0, false)
    } else {
        (weight, true)
    }
}

/// Best name contribution across the record's commercial and legal
/// names, each compared as a canonical name key.
fn best_name_score(
    normalized: &NormalizedAttributes,
    record: &CompanyRecord,
    weights: &ScoringWeights,
    distance_threshold: f64,
) -> f64 {
    if normalized.name_key.is_empty() {
        return 0.0;
    }

    [&record.company_commercial_name, &record.company_legal_name]
        .into_iter()
        .filter(|n| !n.is_empty())
        .map(|n| {
            name_score(
                &normalized.name_key,
                &name_key(n),
                weights.name_max,
                distance_threshold,
            )
        })
        .fold(0.0, f64::max)
}

/// Sum of field contributions for one candidate.
#[inline]
pub fn total_score(scores: &[FieldScore]) -> f64 {
    scores.iter().map(|s| s.value).sum()
}
