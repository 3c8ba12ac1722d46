use contracts::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Dense vertex identifier, valid in `[0, vertex_count)` of its graph.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct VertexId {
    /// The underlying raw integer index.
    inner: u32,
}

impl VertexId {
    /// Creates a vertex id from a raw integer.
    #[ensures(ret.inner == id)]
    pub const fn new(id: u32) -> Self {
        Self { inner: id }
    }

    /// Returns the id as a usize for array access.
    #[ensures(ret == self.inner as usize)]
    pub const fn as_usize(self) -> usize {
        self.inner as usize
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<usize> for VertexId {
    /// Callers pass ids of an already validated graph, which fit in `u32`.
    #[inline]
    #[debug_requires(u32::try_from(id).is_ok())]
    fn from(id: usize) -> Self {
        Self { inner: id as u32 }
    }
}

impl From<u32> for VertexId {
    #[inline]
    fn from(id: u32) -> Self {
        Self { inner: id }
    }
}

impl From<VertexId> for usize {
    #[inline]
    fn from(id: VertexId) -> Self {
        id.inner as Self
    }
}

impl From<VertexId> for u32 {
    #[inline]
    fn from(id: VertexId) -> Self {
        id.inner
    }
}
