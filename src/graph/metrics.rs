//! Degree statistics over an assembled graph.
//!
//! Edges are counted as stored, repeats included, so an edge emitted twice
//! contributes twice to both endpoints' degree.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::model::{DependencyGraph, NodeType, Relationship};

/// Degree of one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDegree {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub fan_in: usize,
    pub fan_out: usize,
    pub degree: usize,
}

/// Summary statistics of a graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetrics {
    pub node_counts: BTreeMap<NodeType, usize>,
    pub edge_counts: BTreeMap<Relationship, usize>,
    /// Highest total degree first, `Contains` edges excluded
    pub most_connected: Vec<NodeDegree>,
    /// Modules and files with the most inbound `Imports` edges
    pub most_imported: Vec<NodeDegree>,
}

/// Compute graph metrics.
///
/// # Arguments
/// * `graph` - Assembled graph
/// * `top_n` - Length of the ranked lists
///
/// Ties are broken by node id so the ranking is deterministic.
pub fn graph_metrics(graph: &DependencyGraph, top_n: usize) -> GraphMetrics {
    let mut node_counts = BTreeMap::new();
    for node in &graph.nodes {
        *node_counts.entry(node.node_type).or_insert(0) += 1;
    }

    let mut edge_counts = BTreeMap::new();
    let mut fan_in: HashMap<&str, usize> = HashMap::new();
    let mut fan_out: HashMap<&str, usize> = HashMap::new();
    let mut imported: HashMap<&str, usize> = HashMap::new();
    for edge in &graph.edges {
        *edge_counts.entry(edge.relationship).or_insert(0) += 1;
        if edge.relationship == Relationship::Contains {
            continue;
        }
        *fan_out.entry(edge.source.as_str()).or_insert(0) += 1;
        *fan_in.entry(edge.target.as_str()).or_insert(0) += 1;
        if edge.relationship == Relationship::Imports {
            *imported.entry(edge.target.as_str()).or_insert(0) += 1;
        }
    }

    let degree_of = |node: &super::GraphNode| {
        let fan_in = fan_in.get(node.id.as_str()).copied().unwrap_or(0);
        let fan_out = fan_out.get(node.id.as_str()).copied().unwrap_or(0);
        NodeDegree {
            id: node.id.clone(),
            name: node.name.clone(),
            node_type: node.node_type,
            fan_in,
            fan_out,
            degree: fan_in + fan_out,
        }
    };

    let mut most_connected: Vec<NodeDegree> = graph
        .nodes
        .iter()
        .map(degree_of)
        .filter(|d| d.degree > 0)
        .collect();
    most_connected.sort_by(|a, b| b.degree.cmp(&a.degree).then_with(|| a.id.cmp(&b.id)));
    most_connected.truncate(top_n);

    let mut most_imported: Vec<(usize, NodeDegree)> = graph
        .nodes
        .iter()
        .filter_map(|node| {
            imported
                .get(node.id.as_str())
                .map(|&count| (count, degree_of(node)))
        })
        .collect();
    most_imported.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.id.cmp(&b.1.id)));
    most_imported.truncate(top_n);

    GraphMetrics {
        node_counts,
        edge_counts,
        most_connected,
        most_imported: most_imported.into_iter().map(|(_, d)| d).collect(),
    }
}
