use simql_common::GraphError;
use thiserror::Error;

/// Failure of a match call.
///
/// An unsatisfiable query is not an error; see [`crate::MatchResult::satisfiable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// The graphs are inconsistent with each other or with the requested strategy.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl MatchError {
    /// Shorthand for an [`GraphError::Unsupported`] failure.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Graph(GraphError::unsupported(msg))
    }

    /// Returns true for [`GraphError::Unsupported`].
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::Graph(GraphError::Unsupported(_)))
    }
}
