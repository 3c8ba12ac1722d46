//! Incremental construction of a [`LabeledGraph`].

use std::collections::HashMap;

use crate::error::GraphError;
use crate::graph::{EdgeLabel, Label, LabeledGraph, VertexId};

/// Collects vertices and edges, then validates them in [`GraphBuilder::build`].
///
/// Edges are not checked as they are added, so an edge may name a vertex that
/// is added later. Anything still dangling at `build` time is an error.
#[derive(Clone, Debug, Default)]
pub struct GraphBuilder {
    labels: Vec<Label>,
    edges: Vec<(usize, usize)>,
    edge_labels: HashMap<(usize, usize), EdgeLabel>,
    parents: bool,
}

impl GraphBuilder {
    /// An empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder pre-populated with one vertex per label.
    #[must_use]
    pub fn with_labels(labels: impl IntoIterator<Item = Label>) -> Self {
        Self {
            labels: labels.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Also build parent sets, which the dual refinement needs.
    #[must_use]
    pub fn with_parents(mut self, parents: bool) -> Self {
        self.parents = parents;
        self
    }

    /// Number of vertices added so far.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.labels.len()
    }

    /// Adds a vertex and returns its raw id.
    pub fn add_vertex(&mut self, label: Label) -> usize {
        self.labels.push(label);
        self.labels.len() - 1
    }

    /// Adds the edge `from -> to`.
    pub fn add_edge(&mut self, from: usize, to: usize) -> &mut Self {
        self.edges.push((from, to));
        self
    }

    /// Adds the edge `from -> to` carrying `label`.
    pub fn add_labeled_edge(&mut self, from: usize, to: usize, label: EdgeLabel) -> &mut Self {
        self.edges.push((from, to));
        self.edge_labels.insert((from, to), label);
        self
    }

    /// Validates and freezes the graph.
    ///
    /// Fails with `OutOfRange` for an edge endpoint that is not a vertex, and
    /// with `InvalidGraph` if there are more vertices than ids can address.
    pub fn build(self) -> Result<LabeledGraph, GraphError> {
        let Self {
            labels,
            edges,
            edge_labels,
            parents,
        } = self;
        let vertex_count = labels.len();
        let to_id = |raw: usize| resolve(raw, vertex_count);

        let mut children: Vec<Vec<VertexId>> = vec![Vec::new(); vertex_count];
        for (from, to) in edges {
            let (from, to) = (to_id(from)?, to_id(to)?);
            children[from.as_usize()].push(to);
        }
        let edge_labels = edge_labels
            .into_iter()
            .map(|((from, to), label)| Ok(((to_id(from)?, to_id(to)?), label)))
            .collect::<Result<HashMap<_, _>, GraphError>>()?;

        let edge_labels = (!edge_labels.is_empty()).then_some(edge_labels);
        let graph = LabeledGraph::from_parts(labels, children, None, edge_labels)?;
        Ok(if parents { graph.with_parents() } else { graph })
    }
}

/// Turns a raw id into a [`VertexId`] without truncation.
fn resolve(raw: usize, vertex_count: usize) -> Result<VertexId, GraphError> {
    let id = u32::try_from(raw).map_err(|_| {
        GraphError::invalid(format!("vertex id {raw} does not fit in 32 bits"))
    })?;
    if raw < vertex_count {
        Ok(VertexId::new(id))
    } else {
        Err(GraphError::OutOfRange {
            vertex: VertexId::new(id),
            vertex_count,
        })
    }
}
