//! Random data graphs and BFS-sampled query graphs for benchmarking.
//!
//! Every function takes the caller's RNG so runs are reproducible from a seed.

use std::collections::{HashMap, HashSet, VecDeque};

use itertools::Itertools;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::error::GraphError;
use crate::graph::{EdgeLabel, GraphBuilder, Label, LabeledGraph, VertexId};

fn edge_budget(vertex_count: usize, avg_out_degree: f64) -> usize {
    let max_edges = vertex_count.saturating_mul(vertex_count);
    let wanted = (vertex_count as f64 * avg_out_degree.max(0.0)).round() as usize;
    wanted.min(max_edges)
}

/// Generates a graph with uniformly random labels in `0..label_count` and
/// about `vertex_count * avg_out_degree` distinct edges (self-loops allowed).
pub fn generate_random_graph<R: Rng>(
    vertex_count: usize,
    label_count: usize,
    avg_out_degree: f64,
    rng: &mut R,
) -> Result<LabeledGraph, GraphError> {
    if vertex_count > 0 && label_count == 0 {
        return Err(GraphError::invalid(
            "a non-empty graph needs at least one label",
        ));
    }

    let mut builder = GraphBuilder::with_labels(
        (0..vertex_count).map(|_| rng.random_range(0..label_count) as Label),
    );

    let budget = edge_budget(vertex_count, avg_out_degree);
    let mut seen: HashSet<(usize, usize)> = HashSet::with_capacity(budget);
    while seen.len() < budget {
        let edge = (
            rng.random_range(0..vertex_count),
            rng.random_range(0..vertex_count),
        );
        if seen.insert(edge) {
            builder.add_edge(edge.0, edge.1);
        }
    }

    debug!(
        "generated random graph: {} vertices, {} labels, {} edges",
        vertex_count, label_count, budget
    );
    builder.build()
}

/// Labels every edge of `graph` with a uniformly random label in
/// `0..edge_label_count`.
pub fn assign_random_edge_labels<R: Rng>(
    graph: LabeledGraph,
    edge_label_count: usize,
    rng: &mut R,
) -> Result<LabeledGraph, GraphError> {
    if edge_label_count == 0 {
        return Err(GraphError::invalid("edge_label_count must be positive"));
    }
    let labels: HashMap<(VertexId, VertexId), EdgeLabel> = graph
        .edges()
        .sorted()
        .map(|edge| (edge, rng.random_range(0..edge_label_count) as EdgeLabel))
        .collect();
    graph.with_edge_labels(labels)
}

/// Grows a query graph by breadth-first sampling of `source`.
///
/// Up to `vertex_count` source vertices are collected in BFS order from a
/// random start (restarting from a random unvisited vertex whenever the
/// frontier runs dry). The query keeps every BFS tree edge and adds random
/// induced edges of the source until about `vertex_count * avg_out_degree`
/// edges are present. Vertex and edge labels are copied from the source, so
/// the sampled vertices always simulate their query counterparts and the
/// query is satisfiable against `source`.
pub fn generate_bfs_query<R: Rng>(
    vertex_count: usize,
    avg_out_degree: f64,
    source: &LabeledGraph,
    rng: &mut R,
) -> Result<LabeledGraph, GraphError> {
    if vertex_count == 0 {
        return GraphBuilder::new().build();
    }
    if source.is_empty() {
        return Err(GraphError::invalid("cannot sample a query from an empty graph"));
    }
    let vertex_count = vertex_count.min(source.vertex_count());

    let (sampled, tree_edges) = bfs_sample(vertex_count, source, rng);
    let query_id: HashMap<VertexId, usize> = sampled
        .iter()
        .enumerate()
        .map(|(q, &s)| (s, q))
        .collect();

    let tree: HashSet<(VertexId, VertexId)> = tree_edges.iter().copied().collect();
    let mut extra: Vec<(VertexId, VertexId)> = sampled
        .iter()
        .flat_map(|&s| {
            sorted_children(source, s)
                .into_iter()
                .filter(|c| query_id.contains_key(c))
                .map(move |c| (s, c))
        })
        .filter(|edge| !tree.contains(edge))
        .collect();
    extra.shuffle(rng);

    let budget = edge_budget(vertex_count, avg_out_degree).saturating_sub(tree_edges.len());
    extra.truncate(budget);

    let mut builder = GraphBuilder::new().with_parents(source.has_parents());
    for &s in &sampled {
        builder.add_vertex(source.labels()[s.as_usize()]);
    }
    for (s_from, s_to) in tree_edges.into_iter().chain(extra) {
        let (q_from, q_to) = (query_id[&s_from], query_id[&s_to]);
        match source.edge_label(s_from, s_to) {
            Some(label) => builder.add_labeled_edge(q_from, q_to, label),
            None => builder.add_edge(q_from, q_to),
        };
    }

    let mut query = builder.build()?;
    if source.has_edge_labels() && !query.has_edge_labels() {
        // no edges were sampled, keep the query usable for edge-aware matching
        query = query.with_edge_labels(HashMap::new())?;
    }
    debug!(
        "sampled BFS query: {} vertices, {} edges",
        query.vertex_count(),
        query.edge_count()
    );
    Ok(query)
}

fn sorted_children(graph: &LabeledGraph, v: VertexId) -> Vec<VertexId> {
    graph
        .children_of(v)
        .map(|kids| kids.iter().copied().sorted().collect())
        .unwrap_or_default()
}

/// BFS over children. Returns the sampled vertices in visit order and the
/// tree edges that discovered them.
fn bfs_sample<R: Rng>(
    vertex_count: usize,
    source: &LabeledGraph,
    rng: &mut R,
) -> (Vec<VertexId>, Vec<(VertexId, VertexId)>) {
    let mut visited: HashSet<VertexId> = HashSet::with_capacity(vertex_count);
    let mut order: Vec<VertexId> = Vec::with_capacity(vertex_count);
    let mut tree_edges = Vec::new();
    let mut queue: VecDeque<VertexId> = VecDeque::new();

    while order.len() < vertex_count {
        if queue.is_empty() {
            let unvisited: Vec<VertexId> =
                source.vertices().filter(|v| !visited.contains(v)).collect();
            let start = unvisited[rng.random_range(0..unvisited.len())];
            visited.insert(start);
            order.push(start);
            queue.push_back(start);
            continue;
        }

        let Some(current) = queue.pop_front() else {
            break;
        };
        for child in sorted_children(source, current) {
            if order.len() == vertex_count {
                break;
            }
            if visited.insert(child) {
                order.push(child);
                tree_edges.push((current, child));
                queue.push_back(child);
            }
        }
    }

    (order, tree_edges)
}
