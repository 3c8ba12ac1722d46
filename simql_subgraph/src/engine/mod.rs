//! Simulation engine: query plan, support constraints and the fixpoint loop.

mod constraints;
mod result;
mod simulation;
mod strategy;

pub use result::MatchResult;
pub use simulation::SimulationEngine;
