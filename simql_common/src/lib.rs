//! Common types shared across the SIMQL workspace.
//!
//! This crate provides the labeled graph model that the simulation kernel
//! consumes, match configuration, the error taxonomy, and the external
//! collaborators that feed graphs into the kernel (a line-oriented loader and
//! random graph / query generators).

mod config;
mod error;
pub mod generator;
pub mod graph;
pub mod loader;

pub use crate::config::*;
pub use crate::error::*;
pub use crate::graph::{EdgeLabel, GraphBuilder, Label, LabeledGraph, VertexId};
