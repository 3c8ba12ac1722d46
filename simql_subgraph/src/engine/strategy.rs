//! Per-strategy preparation of the query side.
//!
//! The fixpoint loop is the same for every [`Strategy`]. What differs is which
//! query edges constrain a vertex and whether edge labels take part, and that
//! is fixed once here when the engine is built.

use simql_common::{EdgeLabel, GraphError, LabeledGraph, Strategy, VertexId};

/// One query edge seen from one of its endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct QueryEdge {
    /// The endpoint that must be supported (child for out-edges, parent for in-edges).
    pub other: VertexId,
    /// Required data edge label, `None` if any data edge will do.
    pub label: Option<EdgeLabel>,
}

/// Query edges grouped by the vertex they constrain.
#[derive(Clone, Debug, Default)]
pub(crate) struct QueryPlan {
    /// `out_edges[u]`: edges `u -> u_c`.
    pub out_edges: Vec<Vec<QueryEdge>>,
    /// `in_edges[u]`: edges `u_p -> u`. Empty unless the strategy uses parents.
    pub in_edges: Vec<Vec<QueryEdge>>,
}

impl QueryPlan {
    /// Checks that both graphs support `strategy` and gathers the query edges.
    pub(crate) fn build(
        strategy: Strategy,
        data: &LabeledGraph,
        query: &LabeledGraph,
    ) -> Result<Self, GraphError> {
        check_capabilities(strategy, data, query)?;

        let n = query.vertex_count();
        let mut out_edges: Vec<Vec<QueryEdge>> = vec![Vec::new(); n];
        let mut in_edges: Vec<Vec<QueryEdge>> = vec![Vec::new(); n];

        for (u, u_c) in query.edges() {
            let label = if strategy.uses_edge_labels() {
                query.edge_label(u, u_c)
            } else {
                None
            };
            out_edges[u.as_usize()].push(QueryEdge { other: u_c, label });
            if strategy.uses_parents() {
                in_edges[u_c.as_usize()].push(QueryEdge { other: u, label });
            }
        }

        for edges in out_edges.iter_mut().chain(in_edges.iter_mut()) {
            edges.sort_unstable_by_key(|e| (e.other, e.label));
        }

        Ok(Self {
            out_edges,
            in_edges,
        })
    }
}

fn check_capabilities(
    strategy: Strategy,
    data: &LabeledGraph,
    query: &LabeledGraph,
) -> Result<(), GraphError> {
    if strategy.uses_edge_labels() && !(data.has_edge_labels() && query.has_edge_labels()) {
        return Err(GraphError::unsupported(
            "edge-aware refinement needs edge labels on both the data and the query graph",
        ));
    }
    if strategy.uses_parents() && !data.has_parents() {
        return Err(GraphError::unsupported(
            "dual refinement needs a data graph built with parent sets",
        ));
    }
    Ok(())
}
