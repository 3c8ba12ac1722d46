//! Configuration for the simulation search.
//!
//! The engine recognizes two semantic switches, `edge_aware` and `dual_mode`,
//! plus a handful of execution knobs that never change the final fixpoint:
//!
//! - `max_passes`: stop after this many refinement passes. The candidate sets
//!   are then a safe over-approximation of the simulation.
//! - `sweep`: read from a frozen per-pass snapshot, or update in place.
//! - `visit_order`: which end of the query vertex range a pass starts from.
//! - `parallel`: evaluate snapshot passes on the rayon pool.
//!
//! ```ignore
//! use simql_common::Config;
//! let cfg = Config::builder().edge_aware(true).max_passes(Some(32)).build();
//! ```

use serde::{Deserialize, Serialize};

/// How candidate sets are updated within one refinement pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sweep {
    /// Read every candidate set from the previous pass, write a fresh one,
    /// swap at the pass boundary.
    #[default]
    Snapshot,
    /// Update candidate sets in place, so later vertices in a pass observe
    /// removals made earlier in the same pass.
    InPlace,
}

/// Order in which query vertices are visited within a pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisitOrder {
    /// `0, 1, .., n-1`
    #[default]
    Ascending,
    /// `n-1, .., 1, 0`
    Descending,
}

/// Refinement rule, derived from the semantic switches of a [`Config`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Label equality plus child support.
    Plain,
    /// Child support restricted to children reached over an edge with the
    /// query edge's label.
    EdgeLabeled,
    /// Child support plus the symmetric parent-support rule.
    Dual {
        /// Whether edge labels constrain both rules.
        edge_labeled: bool,
    },
}

impl Strategy {
    /// Returns true if edge labels take part in refinement.
    #[must_use]
    pub const fn uses_edge_labels(self) -> bool {
        matches!(self, Self::EdgeLabeled | Self::Dual { edge_labeled: true })
    }

    /// Returns true if the parent-support rule is applied.
    #[must_use]
    pub const fn uses_parents(self) -> bool {
        matches!(self, Self::Dual { .. })
    }
}

/// Global search configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Use edge-labeled refinement. Both graphs must carry edge labels. A
    /// query edge without a label of its own matches a data edge with any
    /// label.
    pub edge_aware: bool,
    /// Add parent-based pruning. The data graph must carry parent sets.
    pub dual_mode: bool,
    /// Upper bound on refinement passes, `None` runs to the fixpoint.
    pub max_passes: Option<usize>,
    /// Snapshot or in-place update.
    pub sweep: Sweep,
    /// Visiting order of query vertices within a pass.
    pub visit_order: VisitOrder,
    /// Evaluate snapshot passes in parallel (needs the `rayon` feature of
    /// `simql_subgraph`; ignored otherwise).
    pub parallel: bool,
}

impl Config {
    /// Start building a configuration from the defaults.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// The refinement rule selected by `edge_aware` and `dual_mode`.
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        match (self.dual_mode, self.edge_aware) {
            (true, edge_labeled) => Strategy::Dual { edge_labeled },
            (false, true) => Strategy::EdgeLabeled,
            (false, false) => Strategy::Plain,
        }
    }
}

/// Builder for [`Config`].
#[derive(Clone, Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Toggle edge-labeled refinement. Unlabeled query edges match any data edge.
    #[must_use]
    pub fn edge_aware(mut self, edge_aware: bool) -> Self {
        self.config.edge_aware = edge_aware;
        self
    }

    /// Toggle parent-based pruning.
    #[must_use]
    pub fn dual_mode(mut self, dual_mode: bool) -> Self {
        self.config.dual_mode = dual_mode;
        self
    }

    /// Bound the number of refinement passes.
    #[must_use]
    pub fn max_passes(mut self, max_passes: Option<usize>) -> Self {
        self.config.max_passes = max_passes;
        self
    }

    /// Select the update scheme.
    #[must_use]
    pub fn sweep(mut self, sweep: Sweep) -> Self {
        self.config.sweep = sweep;
        self
    }

    /// Select the visiting order.
    #[must_use]
    pub fn visit_order(mut self, visit_order: VisitOrder) -> Self {
        self.config.visit_order = visit_order;
        self
    }

    /// Toggle parallel evaluation of snapshot passes.
    #[must_use]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Finish the builder.
    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }
}
