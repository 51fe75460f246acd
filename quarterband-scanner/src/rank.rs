//! Deterministic ordering of scored candidates.

use std::cmp::Ordering;

use itertools::Itertools;

use crate::market::ScoredCandidate;

/// Sort by descending probability, tie-broken by descending 24h dollar
/// volume (unknown volume ranks as zero), and keep the first `k`.
///
/// The sort is stable and the comparator is built on `f64::total_cmp`, so
/// ordering is total even for degenerate float inputs and identical inputs
/// always produce identical output.
pub fn top_k(candidates: Vec<ScoredCandidate>, k: usize) -> Vec<ScoredCandidate> {
    candidates.into_iter().sorted_by(compare).take(k).collect()
}

fn compare(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.probability_pct
        .total_cmp(&a.probability_pct)
        .then_with(|| {
            let volume_a = a.dollar_volume_24h.unwrap_or(0.0);
            let volume_b = b.dollar_volume_24h.unwrap_or(0.0);
            volume_b.total_cmp(&volume_a)
        })
}
