#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Once;

use rand::SeedableRng;
use rand::rngs::StdRng;
use simql_common::generator::{assign_random_edge_labels, generate_bfs_query, generate_random_graph};
use simql_common::{Config, LabeledGraph, Strategy, VertexId};
use simql_subgraph::CandidateMapping;

static INIT: Once = Once::new();

/// Configures logging for the test runner.
pub fn setup_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A random data graph and a random query over the same label alphabets.
#[derive(Clone, Debug)]
pub struct Instance {
    pub data: LabeledGraph,
    pub query: LabeledGraph,
}

/// Small enough for the reference simulation, dense enough for refinement to
/// remove something most of the time.
pub fn random_instance(seed: u64) -> Instance {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = generate_random_graph(12, 3, 1.5, &mut rng).unwrap();
    let data = assign_random_edge_labels(data, 2, &mut rng)
        .unwrap()
        .with_parents();
    let query = generate_random_graph(4, 3, 1.2, &mut rng).unwrap();
    let query = assign_random_edge_labels(query, 2, &mut rng).unwrap();
    Instance { data, query }
}

/// A query sampled from its own data graph.
pub fn sampled_instance(seed: u64) -> Instance {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = generate_random_graph(30, 4, 2.0, &mut rng).unwrap();
    let data = assign_random_edge_labels(data, 3, &mut rng)
        .unwrap()
        .with_parents();
    let query = generate_bfs_query(6, 1.5, &data, &mut rng).unwrap();
    Instance { data, query }
}

pub const ALL_STRATEGIES: [Strategy; 4] = [
    Strategy::Plain,
    Strategy::EdgeLabeled,
    Strategy::Dual {
        edge_labeled: false,
    },
    Strategy::Dual { edge_labeled: true },
];

/// Maximal simulation by repeated pairwise elimination over the full
/// `query x data` relation, without any candidate index.
pub fn reference_simulation(
    data: &LabeledGraph,
    query: &LabeledGraph,
    strategy: Strategy,
) -> Vec<BTreeSet<VertexId>> {
    let data_edges: Vec<(VertexId, VertexId)> = data.edges().collect();
    let query_edges: Vec<(VertexId, VertexId)> = query.edges().collect();
    let edge_ok = |q: (VertexId, VertexId), d: (VertexId, VertexId)| {
        !strategy.uses_edge_labels() || query.edge_label(q.0, q.1) == data.edge_label(d.0, d.1)
    };

    let mut sim: Vec<Vec<bool>> = query
        .labels()
        .iter()
        .map(|lq| data.labels().iter().map(|ld| lq == ld).collect())
        .collect();

    let mut changed = true;
    while changed {
        changed = false;
        for u in query.vertices() {
            for v in data.vertices() {
                if !sim[u.as_usize()][v.as_usize()] {
                    continue;
                }
                let children_ok = query_edges.iter().filter(|e| e.0 == u).all(|&qe| {
                    data_edges.iter().any(|&de| {
                        de.0 == v && sim[qe.1.as_usize()][de.1.as_usize()] && edge_ok(qe, de)
                    })
                });
                let parents_ok = !strategy.uses_parents()
                    || query_edges.iter().filter(|e| e.1 == u).all(|&qe| {
                        data_edges.iter().any(|&de| {
                            de.1 == v && sim[qe.0.as_usize()][de.0.as_usize()] && edge_ok(qe, de)
                        })
                    });
                if !(children_ok && parents_ok) {
                    sim[u.as_usize()][v.as_usize()] = false;
                    changed = true;
                }
            }
        }
    }

    sim.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .filter(|(_, keep)| **keep)
                .map(|(v, _)| VertexId::from(v))
                .collect()
        })
        .collect()
}

/// Candidate sets as ordered sets, for comparison with the reference.
pub fn ordered(phi: &CandidateMapping) -> Vec<BTreeSet<VertexId>> {
    phi.iter().map(|(_, set)| set.iter().copied().collect()).collect()
}

/// The configuration that selects `strategy`.
pub fn config_for(strategy: Strategy) -> Config {
    let (dual_mode, edge_aware) = match strategy {
        Strategy::Plain => (false, false),
        Strategy::EdgeLabeled => (false, true),
        Strategy::Dual { edge_labeled } => (true, edge_labeled),
    };
    Config::builder()
        .dual_mode(dual_mode)
        .edge_aware(edge_aware)
        .build()
}
