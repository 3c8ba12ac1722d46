//! Initial candidate sets from label equality.

use std::collections::HashSet;

use simql_common::{LabeledGraph, VertexId};
use tracing::debug;

use crate::mapping::CandidateMapping;
use crate::profiling::Timer;

/// Seeds phi before any structural refinement.
pub struct CandidateIndex;

impl CandidateIndex {
    /// `phi[u] = { v in data : label(v) == label(u) }` for every query vertex `u`.
    ///
    /// Uses the label index of `data`, so the cost is `O(|Q| + |V_G|)` plus the
    /// size of the output. A query vertex whose label does not occur in `data`
    /// gets an empty set; deciding what that means is up to the caller.
    #[must_use]
    pub fn seed(data: &LabeledGraph, query: &LabeledGraph) -> CandidateMapping {
        let _t = Timer::new("CandidateIndex::seed");

        let sets: Vec<HashSet<VertexId>> = query
            .labels()
            .iter()
            .map(|&label| data.vertices_with_label(label).iter().copied().collect())
            .collect();
        let phi = CandidateMapping::new(sets);

        debug!(
            "seeded {} query vertices with {} candidates",
            phi.len(),
            phi.total_candidates()
        );
        phi
    }

    /// Same result as [`CandidateIndex::seed`] by comparing every pair of
    /// vertices, `O(|Q| * |V_G|)`. Kept as a baseline for benchmarking.
    #[must_use]
    pub fn seed_by_scan(data: &LabeledGraph, query: &LabeledGraph) -> CandidateMapping {
        let _t = Timer::new("CandidateIndex::seed_by_scan");

        let sets = query
            .labels()
            .iter()
            .map(|&label| {
                data.vertices()
                    .filter(|v| data.labels()[v.as_usize()] == label)
                    .collect()
            })
            .collect();
        CandidateMapping::new(sets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simql_common::GraphBuilder;

    #[test]
    fn seeds_by_label() {
        let data = GraphBuilder::with_labels([0, 1, 1, 0]).build().unwrap();
        let query = GraphBuilder::with_labels([1, 0, 2]).build().unwrap();

        let phi = CandidateIndex::seed(&data, &query);
        assert_eq!(phi.sorted(VertexId::new(0)), vec![VertexId::new(1), VertexId::new(2)]);
        assert_eq!(phi.sorted(VertexId::new(1)), vec![VertexId::new(0), VertexId::new(3)]);
        assert!(phi.get(VertexId::new(2)).is_empty());
        assert_eq!(phi.first_empty(), Some(VertexId::new(2)));
    }

    #[test]
    fn scan_agrees_with_index() {
        let data = GraphBuilder::with_labels([5, 3, 5, 5, 9]).build().unwrap();
        let query = GraphBuilder::with_labels([5, 9, 3, 4]).build().unwrap();
        assert_eq!(
            CandidateIndex::seed(&data, &query),
            CandidateIndex::seed_by_scan(&data, &query)
        );
    }

    #[test]
    fn empty_query_seeds_nothing() {
        let data = GraphBuilder::with_labels([1]).build().unwrap();
        let query = GraphBuilder::new().build().unwrap();
        assert!(CandidateIndex::seed(&data, &query).is_empty());
    }
}
