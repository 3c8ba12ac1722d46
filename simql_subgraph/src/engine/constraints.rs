//! Support predicates a candidate must satisfy to survive a pass.

use simql_common::{EdgeLabel, GraphError, LabeledGraph, VertexId};

use super::strategy::QueryEdge;
use crate::mapping::CandidateMapping;
use crate::utils::any_shared;

pub(crate) trait Constraint {
    /// Returns true if data vertex `v` may stay a candidate, judged against `phi`.
    fn candidate_is_valid(&self, v: VertexId, phi: &CandidateMapping) -> Result<bool, GraphError>;
}

/// Does the data edge `from -> to` satisfy a query edge that requires `label`?
fn edge_label_matches(
    data: &LabeledGraph,
    from: VertexId,
    to: VertexId,
    label: Option<EdgeLabel>,
) -> bool {
    label.is_none_or(|wanted| data.edge_label(from, to) == Some(wanted))
}

/// Every query edge `u -> u_c` needs a data child of `v` in `phi[u_c]`.
pub(crate) struct ChildSupport<'a> {
    data: &'a LabeledGraph,
    edges: &'a [QueryEdge],
}

impl<'a> ChildSupport<'a> {
    pub(crate) const fn new(data: &'a LabeledGraph, edges: &'a [QueryEdge]) -> Self {
        ChildSupport { data, edges }
    }
}

impl Constraint for ChildSupport<'_> {
    fn candidate_is_valid(&self, v: VertexId, phi: &CandidateMapping) -> Result<bool, GraphError> {
        let children = self.data.children_of(v)?;
        Ok(self.edges.iter().all(|edge| {
            any_shared(children, phi.get(edge.other), |&v_c| {
                edge_label_matches(self.data, v, v_c, edge.label)
            })
        }))
    }
}

/// Every query edge `u_p -> u` needs a data parent of `v` in `phi[u_p]`.
pub(crate) struct ParentSupport<'a> {
    data: &'a LabeledGraph,
    edges: &'a [QueryEdge],
}

impl<'a> ParentSupport<'a> {
    pub(crate) const fn new(data: &'a LabeledGraph, edges: &'a [QueryEdge]) -> Self {
        ParentSupport { data, edges }
    }
}

impl Constraint for ParentSupport<'_> {
    fn candidate_is_valid(&self, v: VertexId, phi: &CandidateMapping) -> Result<bool, GraphError> {
        if self.edges.is_empty() {
            return Ok(true);
        }
        let parents = self.data.parents_of(v)?;
        Ok(self.edges.iter().all(|edge| {
            any_shared(parents, phi.get(edge.other), |&v_p| {
                edge_label_matches(self.data, v_p, v, edge.label)
            })
        }))
    }
}

/// All constraints on one query vertex.
pub(crate) struct VertexConstraints<'a> {
    children: ChildSupport<'a>,
    parents: Option<ParentSupport<'a>>,
}

impl<'a> VertexConstraints<'a> {
    pub(crate) const fn new(children: ChildSupport<'a>, parents: Option<ParentSupport<'a>>) -> Self {
        VertexConstraints { children, parents }
    }
}

impl Constraint for VertexConstraints<'_> {
    fn candidate_is_valid(&self, v: VertexId, phi: &CandidateMapping) -> Result<bool, GraphError> {
        if !self.children.candidate_is_valid(v, phi)? {
            return Ok(false);
        }
        match &self.parents {
            Some(parents) => parents.candidate_is_valid(v, phi),
            None => Ok(true),
        }
    }
}
