/*!
 * Prioritization
 * Total ordering over recommendation candidates
 */

use super::recommendation::Recommendation;
use std::cmp::Ordering;

/// A candidate tagged with its detector's catalogue position
pub type Candidate = (usize, Recommendation);

/// Order two candidates, most urgent first
///
/// Severity, then impact score (absent last), then occurrences, then
/// affected operation count, then catalogue position.
pub fn compare(a: &Candidate, b: &Candidate) -> Ordering {
    let (a_index, a) = a;
    let (b_index, b) = b;

    b.severity
        .cmp(&a.severity)
        .then_with(|| compare_scores(a.impact_score(), b.impact_score()))
        .then_with(|| b.occurrences.cmp(&a.occurrences))
        .then_with(|| b.affected_operations.len().cmp(&a.affected_operations.len()))
        .then_with(|| a_index.cmp(b_index))
}

fn compare_scores(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort of all candidates; equal keys keep emission order
pub fn prioritize(mut candidates: Vec<Candidate>) -> Vec<Recommendation> {
    candidates.sort_by(compare);
    candidates.into_iter().map(|(_, rec)| rec).collect()
}
