use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use simql_common::{Config, Sweep, VisitOrder};

/// SIMQL - graph simulation matching of labeled query graphs
#[derive(Parser, Debug)]
#[command(name = "simql")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Match a query graph file against a data graph file
    Match(MatchArgs),
    /// Generate a random data graph and BFS-sampled queries, match them in parallel
    Random(RandomArgs),
}

/// Options shared by every subcommand that runs the engine.
#[derive(clap::Args, Debug, Clone)]
pub struct EngineArgs {
    /// Only count children reached over an edge with the query edge's label
    #[arg(short = 'e', long, default_value_t = false)]
    pub edge_aware: bool,

    /// Also require parent support (builds parent sets for the data graph)
    #[arg(short = 'd', long, default_value_t = false)]
    pub dual: bool,

    /// Stop after this many refinement passes
    #[arg(long)]
    pub max_passes: Option<usize>,

    /// Update candidate sets in place instead of per-pass snapshots
    #[arg(long, default_value_t = false)]
    pub in_place: bool,

    /// Visit query vertices from the highest id down
    #[arg(long, default_value_t = false)]
    pub descending: bool,

    /// Evaluate the query vertices of a snapshot pass in parallel
    #[arg(short = 'p', long, default_value_t = false)]
    pub parallel: bool,
}

impl EngineArgs {
    /// Convert command-line arguments into internal configuration
    pub fn to_config(&self) -> Config {
        Config::builder()
            .edge_aware(self.edge_aware)
            .dual_mode(self.dual)
            .max_passes(self.max_passes)
            .sweep(if self.in_place {
                Sweep::InPlace
            } else {
                Sweep::Snapshot
            })
            .visit_order(if self.descending {
                VisitOrder::Descending
            } else {
                VisitOrder::Ascending
            })
            .parallel(self.parallel)
            .build()
    }
}

#[derive(clap::Args, Debug)]
pub struct MatchArgs {
    /// Data graph, one `<id> <label> <child>...` line per vertex
    pub data: PathBuf,

    /// Query graph in the same format
    pub query: PathBuf,

    /// Edge labels of the data graph, one `<from> <to> <label>` line per edge
    #[arg(long)]
    pub data_edge_labels: Option<PathBuf>,

    /// Edge labels of the query graph
    #[arg(long)]
    pub query_edge_labels: Option<PathBuf>,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// How to print the result
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug)]
pub struct RandomArgs {
    /// Vertices in the data graph
    #[arg(long, default_value_t = 10_000)]
    pub vertices: usize,

    /// Distinct vertex labels
    #[arg(long, default_value_t = 16)]
    pub labels: usize,

    /// Average out-degree of the data graph
    #[arg(long, default_value_t = 4.0)]
    pub degree: f64,

    /// Distinct edge labels; edges stay unlabeled if omitted
    #[arg(long)]
    pub edge_labels: Option<usize>,

    /// Number of queries to sample
    #[arg(short = 'n', long, default_value_t = 32)]
    pub queries: usize,

    /// Vertices per query
    #[arg(long, default_value_t = 8)]
    pub query_vertices: usize,

    /// Average out-degree of each query
    #[arg(long, default_value_t = 1.5)]
    pub query_degree: f64,

    /// RNG seed
    #[arg(short = 's', long, default_value_t = 0)]
    pub seed: u64,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Output format of the `match` subcommand
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Header line plus one `u -> {v, ..}` line per query vertex
    #[value(name = "text")]
    Text,
    /// The whole result as JSON
    #[value(name = "json")]
    Json,
    /// `query_vertex,data_vertex` pairs
    #[value(name = "csv")]
    Csv,
}
