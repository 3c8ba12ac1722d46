use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use simql_common::VertexId;

use crate::mapping::CandidateMapping;

/// Outcome of one simulation run.
///
/// An unsatisfiable query is a regular result (`satisfiable == false`), never
/// an error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Final candidate sets.
    pub phi: CandidateMapping,
    /// False iff some candidate set became empty.
    pub satisfiable: bool,
    /// Refinement passes performed. Zero when seeding already left an empty set.
    pub iterations: usize,
    /// False only if the pass limit stopped refinement before a fixpoint.
    /// `phi` is then an over-approximation of the maximal simulation.
    pub converged: bool,
}

impl MatchResult {
    pub(crate) const fn new(
        phi: CandidateMapping,
        satisfiable: bool,
        iterations: usize,
        converged: bool,
    ) -> Self {
        Self {
            phi,
            satisfiable,
            iterations,
            converged,
        }
    }

    /// Candidates of query vertex `u`.
    #[must_use]
    pub fn candidates(&self, u: VertexId) -> &HashSet<VertexId> {
        self.phi.get(u)
    }

    /// Candidates of query vertex `u`, ascending.
    #[must_use]
    pub fn sorted_candidates(&self, u: VertexId) -> Vec<VertexId> {
        self.phi.sorted(u)
    }

    /// Sum of all candidate set sizes.
    #[must_use]
    pub fn total_candidates(&self) -> usize {
        self.phi.total_candidates()
    }

    /// Returns true if the query had no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phi.is_empty()
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "satisfiable={} passes={} converged={}",
            self.satisfiable, self.iterations, self.converged
        )?;
        write!(f, "{}", self.phi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_has_header_and_sets() {
        let phi = CandidateMapping::new(vec![
            [VertexId::new(2), VertexId::new(0)].into_iter().collect(),
            HashSet::new(),
        ]);
        let result = MatchResult::new(phi, false, 3, true);
        assert_eq!(
            result.to_string(),
            "satisfiable=false passes=3 converged=true\n0 -> {0, 2}\n1 -> {}\n"
        );
        assert_eq!(result.total_candidates(), 2);
        assert!(result.candidates(VertexId::new(1)).is_empty());
    }
}
