//! Title similarity and best-candidate selection.
//!
//! Similarity is a symmetric [0,1] ratio computed over normalized titles.
//! Selection is strictly-greater-than, so the first occurrence wins ties,
//! and anything below [`MATCH_THRESHOLD`] is reported as no match rather
//! than a low-confidence record.

use crate::text::normalize_text;

/// Minimum combined score a candidate must reach to count as a match.
pub const MATCH_THRESHOLD: f64 = 0.45;

/// Similarity ratio between two titles after normalization.
///
/// Returns 0.0 when either side is empty. Identical strings score 1.0; the
/// ratio is symmetric and based on sequence alignment (indel distance).
pub fn title_similarity(left: &str, right: &str) -> f64 {
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    let norm_left = normalize_text(left);
    let norm_right = normalize_text(right);
    if norm_left.is_empty() || norm_right.is_empty() {
        return 0.0;
    }
    rapidfuzz::fuzz::ratio(norm_left.chars(), norm_right.chars())
}

/// Pick the highest-scoring candidate from `items`, or `None` if the best
/// score falls below [`MATCH_THRESHOLD`]. Comparison is strictly greater,
/// so earlier candidates win ties.
pub fn select_best<T>(items: &[T], mut score_fn: impl FnMut(&T) -> f64) -> Option<(&T, f64)> {
    let mut best: Option<(&T, f64)> = None;
    for item in items {
        let score = score_fn(item);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((item, score)),
        }
    }
    best.filter(|(_, score)| *score >= MATCH_THRESHOLD)
}
