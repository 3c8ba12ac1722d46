//! SIMQL command-line tool
//!
//! Loads or generates labeled graphs and computes the maximal simulation of a
//! query graph in a data graph.

#[global_allocator]
/// Global allocator using jemalloc for better performance in parallel workloads.
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

mod args;

use std::error::Error;
use std::io;
use std::time::Instant;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use simql_common::generator::{assign_random_edge_labels, generate_bfs_query, generate_random_graph};
use simql_common::loader::{load_graph, load_labeled_graph};
use simql_common::LabeledGraph;
use simql_subgraph::{MatchResult, SimulationEngine};
use tracing::{info, warn};

use args::{Args, Command, MatchArgs, OutputFormat, RandomArgs};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_thread_ids(true)
        .init();

    match Args::parse().command {
        Command::Match(args) => run_match(&args)?,
        Command::Random(args) => run_random(&args)?,
    }

    simql_subgraph::profiling::report();
    Ok(())
}

fn load(
    graph: &std::path::Path,
    edge_labels: Option<&std::path::Path>,
) -> Result<LabeledGraph, Box<dyn Error>> {
    Ok(match edge_labels {
        Some(edge_labels) => load_labeled_graph(graph, edge_labels)?,
        None => load_graph(graph)?,
    })
}

fn run_match(args: &MatchArgs) -> Result<(), Box<dyn Error>> {
    let config = args.engine.to_config();

    let mut data = load(&args.data, args.data_edge_labels.as_deref())?;
    if config.dual_mode {
        data = data.with_parents();
    }
    let query = load(&args.query, args.query_edge_labels.as_deref())?;

    let result = SimulationEngine::mappings(&data, &query, &config)?;
    match args.format {
        OutputFormat::Text => print!("{result}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Csv => write_csv(&result)?,
    }
    Ok(())
}

fn write_csv(result: &MatchResult) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(io::stdout().lock());
    writer.write_record(["query_vertex", "data_vertex"])?;
    for (u, _) in result.phi.iter() {
        for v in result.sorted_candidates(u) {
            writer.write_record([u.to_string(), v.to_string()])?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn run_random(args: &RandomArgs) -> Result<(), Box<dyn Error>> {
    let config = args.engine.to_config();
    let mut rng = StdRng::seed_from_u64(args.seed);

    let start = Instant::now();
    let mut data = generate_random_graph(args.vertices, args.labels, args.degree, &mut rng)?;
    if let Some(edge_labels) = args.edge_labels {
        data = assign_random_edge_labels(data, edge_labels, &mut rng)?;
    }
    if config.dual_mode {
        data = data.with_parents();
    }
    let queries = (0..args.queries)
        .map(|_| generate_bfs_query(args.query_vertices, args.query_degree, &data, &mut rng))
        .collect::<Result<Vec<_>, _>>()?;
    info!(
        "generated data graph and {} queries in {:?}",
        queries.len(),
        start.elapsed()
    );

    let start = Instant::now();
    let results = queries
        .par_iter()
        .map(|query| SimulationEngine::mappings(&data, query, &config))
        .collect::<Result<Vec<_>, _>>()?;
    let elapsed = start.elapsed();

    for (i, (query, result)) in queries.iter().zip(&results).enumerate() {
        println!(
            "{i}: satisfiable={} passes={} candidates={}",
            result.satisfiable,
            result.iterations,
            result.total_candidates()
        );
        if result.satisfiable
            && result.converged
            && !SimulationEngine::is_simulation(&data, query, config.strategy(), &result.phi)?
        {
            warn!("query {i}: fixpoint failed the soundness check");
        }
    }

    let satisfiable = results.iter().filter(|r| r.satisfiable).count();
    info!(
        "matched {} queries in {:?} ({} satisfiable)",
        results.len(),
        elapsed,
        satisfiable
    );
    Ok(())
}
