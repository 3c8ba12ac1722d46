//! Error types for graph access, construction and loading.
//!
//! An unsatisfiable query is not represented here. It is an ordinary outcome
//! of matching and is reported through the match result instead.

use thiserror::Error;

use crate::graph::VertexId;

/// Errors raised while building or querying a [`crate::LabeledGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A vertex id outside `[0, vertex_count)` was referenced.
    #[error("vertex {vertex} is out of range for a graph with {vertex_count} vertices")]
    OutOfRange {
        /// The offending vertex id.
        vertex: VertexId,
        /// Number of vertices in the graph.
        vertex_count: usize,
    },

    /// An edge-label lookup named a pair that is not a labeled edge.
    #[error("no labeled edge {from} -> {to}")]
    NoSuchEdge {
        /// Source vertex.
        from: VertexId,
        /// Target vertex.
        to: VertexId,
    },

    /// The operation needs a capability the graph or engine does not have.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// The graph violates a structural invariant.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),
}

impl GraphError {
    /// Create an unsupported-operation error.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Create an invalid-graph error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidGraph(msg.into())
    }
}

/// Errors raised while reading graphs from the line-oriented text format.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The underlying file could not be read.
    #[error("failed to read graph file: {0}")]
    Io(#[from] std::io::Error),

    /// A line could not be parsed.
    #[error("line {line}: {message}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// The parsed graph failed validation.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl LoadError {
    /// Create a parse error for a one-based line number.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
