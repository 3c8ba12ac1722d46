//! Line-oriented text format for labeled graphs.
//!
//! Graph files hold one line per vertex:
//!
//! ```text
//! # id label children...
//! 0 0 1
//! 1 1 0
//! 2 1 0
//! 3 0 2
//! ```
//!
//! Ids must be dense from 0 and each must appear exactly once, in any order.
//! Edge-label files hold one `from to label` triple per line. Blank lines and
//! lines starting with `#` are skipped in both.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;
use std::str::FromStr;

use itertools::Itertools;
use tracing::info;

use crate::error::{GraphError, LoadError};
use crate::graph::{EdgeLabel, Label, LabeledGraph, VertexId};

fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

fn field<T: FromStr>(line: usize, raw: &str, what: &str) -> Result<T, LoadError> {
    raw.parse()
        .map_err(|_| LoadError::parse(line, format!("invalid {what} `{raw}`")))
}

/// Parses a graph from the vertex-per-line format.
pub fn parse_graph(text: &str) -> Result<LabeledGraph, LoadError> {
    let mut rows: HashMap<usize, (Label, Vec<VertexId>)> = HashMap::new();

    for (line, content) in content_lines(text) {
        let mut tokens = content.split_whitespace();
        let id: usize = match tokens.next() {
            Some(raw) => field(line, raw, "vertex id")?,
            None => continue,
        };
        let label: Label = match tokens.next() {
            Some(raw) => field(line, raw, "label")?,
            None => return Err(LoadError::parse(line, format!("vertex {id} has no label"))),
        };
        let children = tokens
            .map(|raw| field::<u32>(line, raw, "child id").map(VertexId::new))
            .collect::<Result<Vec<_>, _>>()?;

        if rows.insert(id, (label, children)).is_some() {
            return Err(LoadError::parse(line, format!("vertex {id} is defined twice")));
        }
    }

    let vertex_count = rows.len();
    let mut labels = Vec::with_capacity(vertex_count);
    let mut adjacency = Vec::with_capacity(vertex_count);
    for id in 0..vertex_count {
        let Some((label, children)) = rows.remove(&id) else {
            return Err(GraphError::invalid(format!(
                "vertex ids are not dense: {id} is missing among {vertex_count} vertices"
            ))
            .into());
        };
        labels.push(label);
        adjacency.push(children);
    }

    Ok(LabeledGraph::from_parts(labels, adjacency, None, None)?)
}

/// Parses `from to label` triples.
pub fn parse_edge_labels(
    text: &str,
) -> Result<HashMap<(VertexId, VertexId), EdgeLabel>, LoadError> {
    let mut labels = HashMap::new();
    for (line, content) in content_lines(text) {
        let tokens: Vec<&str> = content.split_whitespace().collect();
        let [from, to, label] = tokens.as_slice() else {
            return Err(LoadError::parse(
                line,
                format!("expected `from to label`, found {} fields", tokens.len()),
            ));
        };
        let key = (
            VertexId::new(field(line, from, "source id")?),
            VertexId::new(field(line, to, "target id")?),
        );
        if labels.insert(key, field(line, label, "edge label")?).is_some() {
            return Err(LoadError::parse(
                line,
                format!("edge {} -> {} is labeled twice", key.0, key.1),
            ));
        }
    }
    Ok(labels)
}

/// Reads a graph file.
pub fn load_graph(path: impl AsRef<Path>) -> Result<LabeledGraph, LoadError> {
    let path = path.as_ref();
    let graph = parse_graph(&std::fs::read_to_string(path)?)?;
    info!(
        "loaded {}: {} vertices, {} edges",
        path.display(),
        graph.vertex_count(),
        graph.edge_count()
    );
    Ok(graph)
}

/// Reads a graph file and attaches the labels from an edge-label file.
pub fn load_labeled_graph(
    graph_path: impl AsRef<Path>,
    edge_label_path: impl AsRef<Path>,
) -> Result<LabeledGraph, LoadError> {
    let graph = load_graph(graph_path)?;
    let edge_labels = parse_edge_labels(&std::fs::read_to_string(edge_label_path)?)?;
    Ok(graph.with_edge_labels(edge_labels)?)
}

/// Renders a graph in the vertex-per-line format, children sorted.
#[must_use]
pub fn write_graph(graph: &LabeledGraph) -> String {
    let mut out = String::new();
    for v in graph.vertices() {
        let label = graph.labels()[v.as_usize()];
        let children = graph
            .children_of(v)
            .map(|kids| kids.iter().sorted().join(" "))
            .unwrap_or_default();
        let _ = writeln!(out, "{v} {label} {children}");
    }
    out
}

/// Renders the edge labels of a graph, sorted by edge.
#[must_use]
pub fn write_edge_labels(graph: &LabeledGraph) -> String {
    let mut out = String::new();
    for (from, to) in graph.edges().sorted() {
        if let Some(label) = graph.edge_label(from, to) {
            let _ = writeln!(out, "{from} {to} {label}");
        }
    }
    out
}
