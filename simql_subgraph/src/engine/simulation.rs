//! The greatest-fixpoint refinement loop.

use std::collections::HashSet;

use simql_common::{Config, GraphError, LabeledGraph, Strategy, Sweep, VertexId, VisitOrder};
use tracing::{debug, info, trace};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use super::constraints::{ChildSupport, Constraint, ParentSupport, VertexConstraints};
use super::result::MatchResult;
use super::strategy::QueryPlan;
use crate::candidates::CandidateIndex;
use crate::error::MatchError;
use crate::mapping::CandidateMapping;
use crate::profiling::Timer;

/// Computes the maximal simulation of a query graph in a data graph.
///
/// Both graphs are borrowed read-only for the lifetime of the engine, so one
/// data graph can back any number of engines running on different threads.
pub struct SimulationEngine<'data, 'query, 'cfg> {
    data: &'data LabeledGraph,
    query: &'query LabeledGraph,
    config: &'cfg Config,
    strategy: Strategy,
    plan: QueryPlan,
}

impl<'data, 'query, 'cfg> SimulationEngine<'data, 'query, 'cfg> {
    /// Prepares a run of `config.strategy()` on the two graphs.
    ///
    /// Fails with `Unsupported` if the strategy needs edge labels or parent
    /// sets the graphs do not carry.
    pub fn new(
        data: &'data LabeledGraph,
        query: &'query LabeledGraph,
        config: &'cfg Config,
    ) -> Result<Self, MatchError> {
        let strategy = config.strategy();
        let plan = QueryPlan::build(strategy, data, query)?;
        Ok(Self {
            data,
            query,
            config,
            strategy,
            plan,
        })
    }

    /// Seeds and refines in one call.
    pub fn mappings(
        data: &LabeledGraph,
        query: &LabeledGraph,
        config: &Config,
    ) -> Result<MatchResult, MatchError> {
        SimulationEngine::new(data, query, config)?.run()
    }

    /// Always fails: a simulation relates vertices many-to-many and cannot by
    /// itself yield one-to-one embeddings.
    pub fn bijections(
        _data: &LabeledGraph,
        _query: &LabeledGraph,
        _config: &Config,
    ) -> Result<Vec<Vec<VertexId>>, MatchError> {
        Err(MatchError::unsupported(
            "graph simulation does not produce bijective matches",
        ))
    }

    /// The refinement rule in use.
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Seeds phi from labels, then refines it until nothing changes, some set
    /// empties, or the pass limit is reached.
    pub fn run(&self) -> Result<MatchResult, MatchError> {
        let _t = Timer::new("SimulationEngine::run");
        info!(
            "matching query ({} vertices, {} edges) against data ({} vertices, {} edges) with {:?}",
            self.query.vertex_count(),
            self.query.edge_count(),
            self.data.vertex_count(),
            self.data.edge_count(),
            self.strategy
        );

        let mut phi = CandidateIndex::seed(self.data, self.query);
        if let Some(u) = phi.first_empty() {
            info!("query vertex {u} has no label match, unsatisfiable before refinement");
            return Ok(MatchResult::new(phi, false, 0, true));
        }

        let order = self.visit_order();
        let mut iterations = 0;
        let (satisfiable, converged) = loop {
            if self.config.max_passes.is_some_and(|max| iterations >= max) {
                debug!("pass limit {iterations} reached before the fixpoint");
                break (true, false);
            }
            iterations += 1;

            let removed = match self.config.sweep {
                Sweep::Snapshot => self.snapshot_pass(&order, &mut phi)?,
                Sweep::InPlace => self.in_place_pass(&order, &mut phi)?,
            };
            debug!(
                "pass {iterations}: removed {removed}, {} candidates left",
                phi.total_candidates()
            );

            if let Some(u) = phi.first_empty() {
                debug!("query vertex {u} lost its last candidate");
                break (false, true);
            }
            if removed == 0 {
                break (true, true);
            }
        };

        info!(
            "simulation finished after {iterations} passes: satisfiable={satisfiable}, converged={converged}, {} candidates",
            phi.total_candidates()
        );
        Ok(MatchResult::new(phi, satisfiable, iterations, converged))
    }

    /// Returns true if `phi` is sound: every candidate carries its query
    /// vertex's label and is supported under `strategy` by candidates of the
    /// neighboring query vertices.
    ///
    /// Any fixpoint reached by [`SimulationEngine::run`] passes this check.
    pub fn is_simulation(
        data: &LabeledGraph,
        query: &LabeledGraph,
        strategy: Strategy,
        phi: &CandidateMapping,
    ) -> Result<bool, MatchError> {
        if phi.len() != query.vertex_count() {
            return Ok(false);
        }
        let plan = QueryPlan::build(strategy, data, query)?;
        for (u, candidates) in phi.iter() {
            let label = query.label_of(u)?;
            let rule = constraints_for(data, &plan, strategy, u);
            for &v in candidates {
                if v.as_usize() >= data.vertex_count() || data.label_of(v)? != label {
                    return Ok(false);
                }
                if !rule.candidate_is_valid(v, phi)? {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    fn visit_order(&self) -> Vec<VertexId> {
        let ascending = self.query.vertices();
        match self.config.visit_order {
            VisitOrder::Ascending => ascending.collect(),
            VisitOrder::Descending => ascending.rev().collect(),
        }
    }

    /// Candidates of `u` that survive one more check against `phi`.
    fn survivors(
        &self,
        u: VertexId,
        phi: &CandidateMapping,
    ) -> Result<HashSet<VertexId>, GraphError> {
        let rule = constraints_for(self.data, &self.plan, self.strategy, u);
        let current = phi.get(u);
        let mut kept = HashSet::with_capacity(current.len());
        for &v in current {
            if rule.candidate_is_valid(v, phi)? {
                kept.insert(v);
            } else {
                trace!("dropping {v} from query vertex {u}");
            }
        }
        Ok(kept)
    }

    /// Computes every next-pass set from the frozen `phi`, then installs them.
    fn snapshot_pass(
        &self,
        order: &[VertexId],
        phi: &mut CandidateMapping,
    ) -> Result<usize, GraphError> {
        let _t = Timer::new("SimulationEngine::snapshot_pass");
        let next = self.next_sets(order, phi)?;

        let mut removed = 0;
        for (u, set) in next {
            removed += phi.get(u).len() - set.len();
            phi.replace(u, set);
        }
        Ok(removed)
    }

    fn next_sets(
        &self,
        order: &[VertexId],
        phi: &CandidateMapping,
    ) -> Result<Vec<(VertexId, HashSet<VertexId>)>, GraphError> {
        #[cfg(feature = "rayon")]
        if self.config.parallel {
            return order
                .par_iter()
                .map(|&u| self.survivors(u, phi).map(|set| (u, set)))
                .collect();
        }

        order
            .iter()
            .map(|&u| self.survivors(u, phi).map(|set| (u, set)))
            .collect()
    }

    /// Updates each set as soon as it is checked, so later vertices of the pass
    /// already see the removals. Stops the pass at the first emptied set.
    fn in_place_pass(
        &self,
        order: &[VertexId],
        phi: &mut CandidateMapping,
    ) -> Result<usize, GraphError> {
        let _t = Timer::new("SimulationEngine::in_place_pass");

        let mut removed = 0;
        for &u in order {
            let rule = constraints_for(self.data, &self.plan, self.strategy, u);
            let mut dropped = Vec::new();
            for &v in phi.get(u) {
                if !rule.candidate_is_valid(v, phi)? {
                    trace!("dropping {v} from query vertex {u}");
                    dropped.push(v);
                }
            }
            if dropped.is_empty() {
                continue;
            }

            removed += dropped.len();
            phi.remove_all(u, &dropped);
            if phi.get(u).is_empty() {
                break;
            }
        }
        Ok(removed)
    }
}

fn constraints_for<'a>(
    data: &'a LabeledGraph,
    plan: &'a QueryPlan,
    strategy: Strategy,
    u: VertexId,
) -> VertexConstraints<'a> {
    let children = ChildSupport::new(data, &plan.out_edges[u.as_usize()]);
    let parents = strategy
        .uses_parents()
        .then(|| ParentSupport::new(data, &plan.in_edges[u.as_usize()]));
    VertexConstraints::new(children, parents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use simql_common::GraphBuilder;

    use crate::test_harness::setup_test_logging;

    fn ids(raw: &[u32]) -> Vec<VertexId> {
        raw.iter().copied().map(VertexId::new).collect()
    }

    /// Labels `[0, 1, 1, 0]`, edges `0->1, 1->0, 2->0, 3->2`.
    fn example_data() -> LabeledGraph {
        let mut b = GraphBuilder::with_labels([0, 1, 1, 0]).with_parents(true);
        b.add_labeled_edge(0, 1, 7)
            .add_labeled_edge(1, 0, 7)
            .add_labeled_edge(2, 0, 7)
            .add_labeled_edge(3, 2, 7);
        b.build().unwrap()
    }

    fn single_edge_query(edge_label: i64) -> LabeledGraph {
        let mut b = GraphBuilder::with_labels([0, 1]);
        b.add_labeled_edge(0, 1, edge_label);
        b.build().unwrap()
    }

    #[test]
    fn single_edge_query_keeps_all_supported_vertices() {
        setup_test_logging();
        let result = SimulationEngine::mappings(
            &example_data(),
            &single_edge_query(7),
            &Config::default(),
        )
        .unwrap();

        assert!(result.satisfiable);
        assert!(result.converged);
        assert_eq!(result.sorted_candidates(VertexId::new(0)), ids(&[0, 3]));
        assert_eq!(result.sorted_candidates(VertexId::new(1)), ids(&[1, 2]));
    }

    #[test]
    fn missing_label_stops_before_refinement() {
        setup_test_logging();
        let data = GraphBuilder::with_labels([1, 2, 3]).build().unwrap();
        let query = GraphBuilder::with_labels([5, 5]).build().unwrap();

        let result = SimulationEngine::mappings(&data, &query, &Config::default()).unwrap();
        assert!(!result.satisfiable);
        assert_eq!(result.iterations, 0);
        assert!(result.candidates(VertexId::new(0)).is_empty());
    }

    #[test]
    fn edge_label_mismatch_is_unsatisfiable_only_when_edge_aware() {
        setup_test_logging();
        let data = example_data();
        let query = single_edge_query(9);

        let plain = SimulationEngine::mappings(&data, &query, &Config::default()).unwrap();
        assert!(plain.satisfiable);

        let edge_aware = Config::builder().edge_aware(true).build();
        let labeled = SimulationEngine::mappings(&data, &query, &edge_aware).unwrap();
        assert!(!labeled.satisfiable);
        assert!(labeled.converged);
    }

    #[test]
    fn dual_mode_prunes_unparented_candidates() {
        setup_test_logging();
        let data = example_data();
        let query = single_edge_query(7);
        let dual = Config::builder().dual_mode(true).build();

        // every candidate of phi[1] has a parent in phi[0] here
        let result = SimulationEngine::mappings(&data, &query, &dual).unwrap();
        assert!(result.satisfiable);
        assert_eq!(result.sorted_candidates(VertexId::new(0)), ids(&[0, 3]));
        assert_eq!(result.sorted_candidates(VertexId::new(1)), ids(&[1, 2]));

        let mut b = GraphBuilder::with_labels([0, 1, 1]).with_parents(true);
        b.add_edge(0, 1);
        let data = b.build().unwrap();
        // 2 has no parent at all
        let result = SimulationEngine::mappings(&data, &query, &dual).unwrap();
        assert_eq!(result.sorted_candidates(VertexId::new(1)), ids(&[1]));
    }

    #[test]
    fn dual_mode_without_parents_is_unsupported() {
        let data = GraphBuilder::with_labels([0, 1]).build().unwrap();
        let query = single_edge_query(7);
        let dual = Config::builder().dual_mode(true).build();
        let err = SimulationEngine::new(&data, &query, &dual).err().unwrap();
        assert!(err.is_unsupported());
    }

    #[test]
    fn pass_limit_reports_no_convergence() {
        setup_test_logging();
        // chain 0 -> 1 -> 2 -> 3 against a query cycle: one vertex falls per pass
        let mut b = GraphBuilder::with_labels([0, 0, 0, 0]);
        b.add_edge(0, 1)
            .add_edge(1, 2)
            .add_edge(2, 3);
        let data = b.build().unwrap();
        let mut q = GraphBuilder::with_labels([0]);
        q.add_edge(0, 0);
        let query = q.build().unwrap();

        let bounded = Config::builder().max_passes(Some(1)).build();
        let partial = SimulationEngine::mappings(&data, &query, &bounded).unwrap();
        assert!(!partial.converged);
        assert_eq!(partial.iterations, 1);
        assert_eq!(partial.sorted_candidates(VertexId::new(0)), ids(&[0, 1, 2]));

        let full = SimulationEngine::mappings(&data, &query, &Config::default()).unwrap();
        assert!(!full.satisfiable);
        assert!(full.converged);
        assert_eq!(full.iterations, 4);
        let in_place = Config::builder().sweep(Sweep::InPlace).build();
        let swept = SimulationEngine::mappings(&data, &query, &in_place).unwrap();
        assert!(!swept.satisfiable);
        assert_eq!(swept.iterations, 4);
        assert!(partial.phi.is_refinement_of(&CandidateIndex::seed(&data, &query)));
        assert!(full.phi.is_refinement_of(&partial.phi));
    }

    #[test]
    fn in_place_sweep_reaches_the_same_fixpoint() {
        setup_test_logging();
        let data = example_data();
        let query = single_edge_query(7);
        let snapshot = SimulationEngine::mappings(&data, &query, &Config::default()).unwrap();
        let in_place = Config::builder()
            .sweep(Sweep::InPlace)
            .visit_order(VisitOrder::Descending)
            .build();
        let swept = SimulationEngine::mappings(&data, &query, &in_place).unwrap();
        assert_eq!(snapshot.phi, swept.phi);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn parallel_snapshot_matches_sequential() {
        setup_test_logging();
        let data = example_data();
        let query = single_edge_query(7);
        for dual_mode in [false, true] {
            let sequential = Config::builder().dual_mode(dual_mode).edge_aware(true).build();
            let parallel = Config::builder()
                .dual_mode(dual_mode)
                .edge_aware(true)
                .parallel(true)
                .build();
            assert_eq!(
                SimulationEngine::mappings(&data, &query, &sequential).unwrap(),
                SimulationEngine::mappings(&data, &query, &parallel).unwrap()
            );
        }
    }

    #[test]
    fn bijections_are_unsupported() {
        let g = example_data();
        let err = SimulationEngine::bijections(&g, &g, &Config::default()).unwrap_err();
        assert!(matches!(err, MatchError::Graph(GraphError::Unsupported(_))));
    }

    #[test]
    fn fixpoint_is_a_simulation() {
        // 4 carries label 0 but has no child
        let mut b = GraphBuilder::with_labels([0, 1, 1, 0, 0]);
        b.add_edge(0, 1).add_edge(1, 0).add_edge(2, 0).add_edge(3, 2);
        let data = b.build().unwrap();
        let query = single_edge_query(7);

        let seeded = CandidateIndex::seed(&data, &query);
        assert!(seeded.contains(VertexId::new(0), VertexId::new(4)));
        assert!(!SimulationEngine::is_simulation(&data, &query, Strategy::Plain, &seeded).unwrap());

        let result = SimulationEngine::mappings(&data, &query, &Config::default()).unwrap();
        assert_eq!(result.sorted_candidates(VertexId::new(0)), ids(&[0, 3]));
        assert!(
            SimulationEngine::is_simulation(&data, &query, Strategy::Plain, &result.phi).unwrap()
        );
    }

    #[test]
    fn emptied_set_stops_refinement_at_that_pass() {
        setup_test_logging();
        // query 0 -> 1 -> 2: pass one drops 1 from phi[0] and 2 from phi[1],
        // pass two empties phi[0] while phi[1] = {3} still has a candidate
        let mut b = GraphBuilder::with_labels([0, 0, 1, 1, 2]);
        b.add_edge(0, 2).add_edge(1, 0).add_edge(3, 4);
        let data = b.build().unwrap();
        let mut q = GraphBuilder::with_labels([0, 1, 2]);
        q.add_edge(0, 1).add_edge(1, 2);
        let query = q.build().unwrap();

        for sweep in [Sweep::Snapshot, Sweep::InPlace] {
            let config = Config::builder().sweep(sweep).build();
            let result = SimulationEngine::mappings(&data, &query, &config).unwrap();
            assert!(!result.satisfiable, "{sweep:?}");
            assert!(result.converged, "{sweep:?}");
            assert!(result.candidates(VertexId::new(0)).is_empty(), "{sweep:?}");
            assert_eq!(result.iterations, 2, "{sweep:?}");
            assert_eq!(result.sorted_candidates(VertexId::new(1)), ids(&[3]), "{sweep:?}");
        }
    }
}
