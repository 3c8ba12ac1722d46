//! Labeled directed graph consumed by the simulation kernel.
//!
//! Both the data graph and the query graph use this type. A graph is built
//! once (through [`GraphBuilder`], [`LabeledGraph::from_parts`], the loader or
//! a generator), validated eagerly, and is read-only afterwards. The only
//! interior state is the lazily built label index, which sits behind a
//! [`OnceLock`] so a graph can be shared across threads running independent
//! matches.

mod builder;
mod vertex_id;

pub use builder::GraphBuilder;
pub use vertex_id::VertexId;

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use tracing::debug;

use crate::error::GraphError;

/// Vertex label.
pub type Label = i64;

/// Edge label, used only by the edge-labeled refinement.
pub type EdgeLabel = i64;

type EdgeLabelMap = HashMap<(VertexId, VertexId), EdgeLabel>;

/// An immutable vertex- and (optionally) edge-labeled directed graph.
#[derive(Clone, Debug, Default)]
pub struct LabeledGraph {
    /// Vertex label, indexed by vertex id.
    labels: Vec<Label>,
    /// Out-neighbours, indexed by vertex id.
    children: Vec<HashSet<VertexId>>,
    /// In-neighbours, present only when parent mode was requested.
    parents: Option<Vec<HashSet<VertexId>>>,
    /// Edge labels, present only for edge-labeled graphs.
    edge_labels: Option<EdgeLabelMap>,
    /// Label -> vertices carrying it, built on first use.
    label_index: OnceLock<HashMap<Label, Vec<VertexId>>>,
}

impl LabeledGraph {
    /// Builds a graph from raw parts and validates every invariant.
    ///
    /// `children[i]` lists the out-neighbours of vertex `i`; duplicates
    /// collapse. When `parents` is given it must be the exact inverse of
    /// `children`. Every edge-label key must be an edge of `children`.
    pub fn from_parts(
        labels: Vec<Label>,
        children: Vec<Vec<VertexId>>,
        parents: Option<Vec<Vec<VertexId>>>,
        edge_labels: Option<EdgeLabelMap>,
    ) -> Result<Self, GraphError> {
        let vertex_count = labels.len();
        if u32::try_from(vertex_count.saturating_sub(1)).is_err() {
            return Err(GraphError::invalid(format!(
                "{vertex_count} vertices cannot be addressed by 32-bit ids"
            )));
        }
        if children.len() != vertex_count {
            return Err(GraphError::invalid(format!(
                "{} labels but {} adjacency lists",
                vertex_count,
                children.len()
            )));
        }

        let children = Self::collect_sets(children, vertex_count)?;

        let parents = match parents {
            Some(parents) => {
                if parents.len() != vertex_count {
                    return Err(GraphError::invalid(format!(
                        "{} labels but {} parent lists",
                        vertex_count,
                        parents.len()
                    )));
                }
                let parents = Self::collect_sets(parents, vertex_count)?;
                Self::check_inverse(&children, &parents)?;
                Some(parents)
            }
            None => None,
        };

        let graph = Self {
            labels,
            children,
            parents,
            edge_labels: None,
            label_index: OnceLock::new(),
        };

        match edge_labels {
            Some(map) => graph.with_edge_labels(map),
            None => Ok(graph),
        }
    }

    fn collect_sets(
        lists: Vec<Vec<VertexId>>,
        vertex_count: usize,
    ) -> Result<Vec<HashSet<VertexId>>, GraphError> {
        lists
            .into_iter()
            .map(|list| {
                list.into_iter()
                    .map(|v| {
                        if v.as_usize() < vertex_count {
                            Ok(v)
                        } else {
                            Err(GraphError::OutOfRange {
                                vertex: v,
                                vertex_count,
                            })
                        }
                    })
                    .collect::<Result<HashSet<_>, _>>()
            })
            .collect()
    }

    fn check_inverse(
        children: &[HashSet<VertexId>],
        parents: &[HashSet<VertexId>],
    ) -> Result<(), GraphError> {
        for (i, kids) in children.iter().enumerate() {
            let i = VertexId::from(i);
            if let Some(j) = kids.iter().find(|j| !parents[j.as_usize()].contains(&i)) {
                return Err(GraphError::invalid(format!(
                    "edge {i} -> {j} is missing from the parent set of {j}"
                )));
            }
        }
        for (j, ps) in parents.iter().enumerate() {
            let j = VertexId::from(j);
            if let Some(i) = ps.iter().find(|i| !children[i.as_usize()].contains(&j)) {
                return Err(GraphError::invalid(format!(
                    "{i} is listed as a parent of {j} but {i} -> {j} is not an edge"
                )));
            }
        }
        Ok(())
    }

    /// Returns the graph with parent sets derived from its children.
    #[must_use]
    pub fn with_parents(mut self) -> Self {
        if self.parents.is_some() {
            return self;
        }
        let mut parents = vec![HashSet::new(); self.vertex_count()];
        for (v, kids) in self.children.iter().enumerate() {
            for child in kids {
                parents[child.as_usize()].insert(VertexId::from(v));
            }
        }
        self.parents = Some(parents);
        self
    }

    /// Attaches edge labels. Every key must name an existing edge.
    pub fn with_edge_labels(mut self, edge_labels: EdgeLabelMap) -> Result<Self, GraphError> {
        for &(from, to) in edge_labels.keys() {
            self.check(from)?;
            self.check(to)?;
            if !self.children[from.as_usize()].contains(&to) {
                return Err(GraphError::invalid(format!(
                    "edge label given for {from} -> {to}, which is not an edge"
                )));
            }
        }
        debug!(
            "attached {} edge labels to a graph with {} edges",
            edge_labels.len(),
            self.edge_count()
        );
        self.edge_labels = Some(edge_labels);
        Ok(self)
    }

    fn check(&self, v: VertexId) -> Result<usize, GraphError> {
        let idx = v.as_usize();
        if idx < self.labels.len() {
            Ok(idx)
        } else {
            Err(GraphError::OutOfRange {
                vertex: v,
                vertex_count: self.labels.len(),
            })
        }
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if the graph has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterates over all vertex ids in ascending order.
    pub fn vertices(&self) -> impl DoubleEndedIterator<Item = VertexId> + ExactSizeIterator + '_ {
        (0..self.labels.len()).map(VertexId::from)
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.children.iter().map(HashSet::len).sum()
    }

    /// Iterates over all edges `(from, to)`. Order within a vertex is unspecified.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.children
            .iter()
            .enumerate()
            .flat_map(|(v, kids)| kids.iter().map(move |&c| (VertexId::from(v), c)))
    }

    /// Returns true if `from -> to` is an edge. Out-of-range ids are not edges.
    #[must_use]
    pub fn has_edge(&self, from: VertexId, to: VertexId) -> bool {
        self.children
            .get(from.as_usize())
            .is_some_and(|kids| kids.contains(&to))
    }

    /// Returns true if parent sets are available.
    #[must_use]
    pub const fn has_parents(&self) -> bool {
        self.parents.is_some()
    }

    /// Returns true if the graph carries edge labels.
    #[must_use]
    pub const fn has_edge_labels(&self) -> bool {
        self.edge_labels.is_some()
    }

    /// All vertex labels, indexed by vertex id.
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Label of `v`.
    pub fn label_of(&self, v: VertexId) -> Result<Label, GraphError> {
        self.check(v).map(|idx| self.labels[idx])
    }

    /// Out-neighbours of `v`.
    pub fn children_of(&self, v: VertexId) -> Result<&HashSet<VertexId>, GraphError> {
        self.check(v).map(|idx| &self.children[idx])
    }

    /// In-neighbours of `v`. Fails with `Unsupported` unless parent mode is enabled.
    pub fn parents_of(&self, v: VertexId) -> Result<&HashSet<VertexId>, GraphError> {
        let idx = self.check(v)?;
        self.parents
            .as_ref()
            .map(|parents| &parents[idx])
            .ok_or_else(|| GraphError::unsupported("graph was built without parent sets"))
    }

    /// Label of the edge `from -> to`.
    pub fn edge_label_of(&self, from: VertexId, to: VertexId) -> Result<EdgeLabel, GraphError> {
        self.check(from)?;
        self.check(to)?;
        let labels = self
            .edge_labels
            .as_ref()
            .ok_or_else(|| GraphError::unsupported("graph carries no edge labels"))?;
        labels
            .get(&(from, to))
            .copied()
            .ok_or(GraphError::NoSuchEdge { from, to })
    }

    /// Label of `from -> to` if the graph has one. Never fails.
    #[must_use]
    pub fn edge_label(&self, from: VertexId, to: VertexId) -> Option<EdgeLabel> {
        self.edge_labels
            .as_ref()
            .and_then(|labels| labels.get(&(from, to)).copied())
    }

    /// Label -> vertices carrying it. Built on first use, in O(vertices).
    pub fn label_index(&self) -> &HashMap<Label, Vec<VertexId>> {
        self.label_index.get_or_init(|| {
            let mut index: HashMap<Label, Vec<VertexId>> = HashMap::new();
            for (v, &label) in self.labels.iter().enumerate() {
                index.entry(label).or_default().push(VertexId::from(v));
            }
            debug!(
                "built label index: {} labels over {} vertices",
                index.len(),
                self.labels.len()
            );
            index
        })
    }

    /// Vertices carrying `label`, in ascending id order.
    pub fn vertices_with_label(&self, label: Label) -> &[VertexId] {
        self.label_index()
            .get(&label)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
