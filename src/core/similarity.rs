use strsim::levenshtein;

/// Edit distance between two strings, normalized by the longer length
/// to the [0, 1] range. Identical strings score 0.0, fully dissimilar
/// strings 1.0. An empty side is maximally distant.
#[inline]
pub fn normalized_edit_distance(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    if a.is_empty() || b.is_empty() {
        return 1.0;
    }

    let max_len = a.chars().count().max(b.chars().count()) as f64;
    levenshtein(a, b) as f64 / max_len
}

/// Scale a name comparison into a score contribution.
///
/// Linear interpolation: `max_weight` at distance 0, down to 0 at
/// `distance_threshold` or beyond. The threshold is configuration,
/// not a fixed law; 1.0 spans the whole normalized range.
#[inline]
pub fn name_score(a: &str, b: &str, max_weight: f64, distance_threshold: f64) -> f64 {
    if a.is_empty() || b.is_empty() || distance_threshold <= 0.0 {
        return 0.0;
    }

    let distance = normalized_edit_distance(a, b);
    if distance >= distance_threshold {
        return 0.0;
    }

    max_weight * (1.0 - distance / distance_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_identical() {
        assert_eq!(normalized_edit_distance("acme corp", "acme corp"), 0.0);
    }

    #[test]
    fn test_distance_empty_sides() {
        assert_eq!(normalized_edit_distance("", ""), 0.0);
        assert_eq!(normalized_edit_distance("acme", ""), 1.0);
        assert_eq!(normalized_edit_distance("", "acme"), 1.0);
    }

    #[test]
    fn test_distance_bounds() {
        let d = normalized_edit_distance("acme corp", "acme corporation");
        assert!(d > 0.0 && d < 1.0, "expected partial distance, got {}", d);
    }

    #[test]
    fn test_name_score_exact_match_gets_full_weight() {
        assert_eq!(name_score("acme corp", "acme corp", 5.0, 1.0), 5.0);
    }

    #[test]
    fn test_name_score_partial_match_between_bounds() {
        let score = name_score("acme corp", "acme corporation", 5.0, 1.0);
        assert!(score > 0.0 && score < 5.0, "expected partial score, got {}", score);
    }

    #[test]
    fn test_name_score_beyond_threshold_is_zero() {
        // Tight threshold: anything but near-identical scores zero.
        let score = name_score("acme corp", "globex industries", 5.0, 0.2);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_name_score_empty_side_is_zero() {
        assert_eq!(name_score("", "acme", 5.0, 1.0), 0.0);
        assert_eq!(name_score("acme", "", 5.0, 1.0), 0.0);
    }

    #[test]
    fn test_threshold_widens_acceptance() {
        let strict = name_score("acme corp", "acme company", 5.0, 0.3);
        let lenient = name_score("acme corp", "acme company", 5.0, 1.0);
        assert!(lenient >= strict);
    }
}
