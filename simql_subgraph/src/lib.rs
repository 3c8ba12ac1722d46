//! Graph simulation matching.
//!
//! Given a labeled data graph and a smaller labeled query graph, computes for
//! every query vertex the maximal set of data vertices that can represent it
//! under a simulation relation. Seeding is done by [`CandidateIndex`] and
//! refinement by [`SimulationEngine`]; the outcome is a [`MatchResult`].
//!
//! ```ignore
//! use simql_subgraph::{Config, SimulationEngine};
//! let result = SimulationEngine::mappings(&data, &query, &Config::default())?;
//! if result.satisfiable {
//!     println!("{result}");
//! }
//! ```

mod candidates;
mod engine;
mod error;
mod mapping;
pub mod profiling;
mod utils;

#[cfg(test)]
mod test_harness;

pub use candidates::CandidateIndex;
pub use engine::{MatchResult, SimulationEngine};
pub use error::MatchError;
pub use mapping::CandidateMapping;
pub use utils::{any_shared, pointwise_subset};

pub use simql_common::{
    Config, ConfigBuilder, GraphError, LabeledGraph, Strategy, Sweep, VertexId, VisitOrder,
};
