//! Candidate sets (phi) indexed by query vertex.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use contracts::*;
use itertools::Itertools;
use serde::Serialize;
use simql_common::VertexId;

use crate::utils::pointwise_subset;

/// For every query vertex, the data vertices that may still represent it.
///
/// During refinement the sets only ever shrink.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CandidateMapping {
    /// Candidate set per query vertex, indexed by query vertex id.
    sets: Vec<HashSet<VertexId>>,
}

impl CandidateMapping {
    /// Wraps one candidate set per query vertex.
    #[must_use]
    pub const fn new(sets: Vec<HashSet<VertexId>>) -> Self {
        Self { sets }
    }

    /// Number of query vertices covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns true if the mapping covers no query vertex.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Candidate set of query vertex `u`. Unknown vertices have no candidates.
    #[must_use]
    pub fn get(&self, u: VertexId) -> &HashSet<VertexId> {
        static EMPTY: LazyLock<HashSet<VertexId>> = LazyLock::new(HashSet::new);
        self.sets.get(u.as_usize()).unwrap_or(&EMPTY)
    }

    /// Returns true if `v` is still a candidate for `u`.
    #[must_use]
    pub fn contains(&self, u: VertexId, v: VertexId) -> bool {
        self.get(u).contains(&v)
    }

    /// Candidates of `u` in ascending order.
    #[must_use]
    pub fn sorted(&self, u: VertexId) -> Vec<VertexId> {
        self.get(u).iter().copied().sorted().collect()
    }

    /// Iterates over `(query vertex, candidate set)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, &HashSet<VertexId>)> + '_ {
        self.sets
            .iter()
            .enumerate()
            .map(|(u, set)| (VertexId::from(u), set))
    }

    /// The lowest query vertex whose candidate set is empty, if any.
    #[must_use]
    pub fn first_empty(&self) -> Option<VertexId> {
        self.sets.iter().position(HashSet::is_empty).map(VertexId::from)
    }

    /// Sum of all candidate set sizes.
    #[must_use]
    pub fn total_candidates(&self) -> usize {
        self.sets.iter().map(HashSet::len).sum()
    }

    /// Returns true if every candidate set is a subset of its counterpart in `other`.
    #[must_use]
    pub fn is_refinement_of(&self, other: &Self) -> bool {
        pointwise_subset(&self.sets, &other.sets)
    }

    /// Removes `removed` from the candidates of `u`.
    #[debug_ensures(self.sets[u.as_usize()].len() <= old(self.sets[u.as_usize()].len()))]
    pub(crate) fn remove_all(&mut self, u: VertexId, removed: &[VertexId]) {
        let set = &mut self.sets[u.as_usize()];
        for v in removed {
            set.remove(v);
        }
    }

    /// Replaces the candidates of `u` with a subset of the current ones.
    #[debug_requires(set.is_subset(&self.sets[u.as_usize()]))]
    pub(crate) fn replace(&mut self, u: VertexId, set: HashSet<VertexId>) {
        self.sets[u.as_usize()] = set;
    }
}

impl fmt::Display for CandidateMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (u, _) in self.iter() {
            writeln!(f, "{u} -> {{{}}}", self.sorted(u).iter().join(", "))?;
        }
        Ok(())
    }
}
