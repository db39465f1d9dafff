//! Node scoring for placement decisions.
//!
//! A candidate is scored by how close the placement leaves the node to a
//! target utilization (65% by default). Both under-use and crowding lower
//! the score linearly:
//!
//! ```text
//! score = 100 − 100 × |projected_utilization − target|
//! ```

use std::cmp::Ordering;

use rackwise_core::{Quantity, ResourceVector};

use crate::planner::Candidate;

/// Default ideal utilization after placement.
pub const DEFAULT_TARGET_UTILIZATION: f64 = 0.65;

/// Mean of `allocated / total` over keys where `total` is positive.
///
/// Keys missing from `allocated` count as zero use. A node with no
/// positive capacity reports 0.0.
pub fn mean_utilization(allocated: &ResourceVector, total: &ResourceVector) -> f64 {
    let ratios: Vec<f64> = total
        .iter()
        .filter_map(|(key, capacity)| {
            allocated
                .get(key)
                .unwrap_or(Quantity::ZERO)
                .ratio_of(capacity)
        })
        .collect();

    if ratios.is_empty() {
        0.0
    } else {
        ratios.iter().sum::<f64>() / ratios.len() as f64
    }
}

/// Utilization after adding `demand` to `allocated`.
pub fn projected_utilization(
    allocated: &ResourceVector,
    demand: &ResourceVector,
    total: &ResourceVector,
) -> f64 {
    mean_utilization(&allocated.plus(demand), total)
}

/// Score a projected utilization against the target band.
pub fn fit_score(utilization: f64, target: f64) -> f64 {
    100.0 - 100.0 * (utilization - target).abs()
}

/// Order candidates best first: descending score, then ascending node ID.
pub fn rank_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(compare_candidates);
}

fn compare_candidates(a: &Candidate, b: &Candidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.node.id.cmp(&b.node.id))
}
