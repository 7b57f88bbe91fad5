//! Graph export for external tools
//!
//! JSON for programs, Graphviz DOT for humans.

use serde::Serialize;
use std::fmt::Write as _;

use crate::error::Result;

use super::model::DependencyGraph;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// `{"nodes": [...], "edges": [...]}`
    Json,
    /// Graphviz DOT digraph
    Dot,
}

impl ExportFormat {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "dot" | "graphviz" => Some(ExportFormat::Dot),
            _ => None,
        }
    }
}

/// Configuration for graph export
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Output format
    pub format: ExportFormat,
    /// Use minified JSON (no pretty-printing)
    pub minify: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            format: ExportFormat::Json,
            minify: false,
        }
    }
}

impl ExportConfig {
    /// Create a new export config for the given format
    pub fn new(format: ExportFormat) -> Self {
        ExportConfig {
            format,
            ..Default::default()
        }
    }

    /// Set whether to minify JSON output
    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }
}

#[derive(Serialize)]
struct GraphCounts {
    nodes: usize,
    edges: usize,
}

#[derive(Serialize)]
struct GraphExport<'a> {
    counts: GraphCounts,
    #[serde(flatten)]
    graph: &'a DependencyGraph,
}

/// Export graph to JSON.
///
/// Nodes and edges keep assembly order; repeated edges are kept.
pub fn export_json(graph: &DependencyGraph, minify: bool) -> Result<String> {
    let export = GraphExport {
        counts: GraphCounts {
            nodes: graph.nodes.len(),
            edges: graph.edges.len(),
        },
        graph,
    };
    let json = if minify {
        serde_json::to_string(&export)?
    } else {
        serde_json::to_string_pretty(&export)?
    };
    Ok(json)
}

/// Export graph to Graphviz DOT.
///
/// Nodes are labelled by name and shaped by type; edges are labelled by
/// relationship.
pub fn export_dot(graph: &DependencyGraph) -> String {
    let mut dot = String::new();
    dot.push_str("digraph cartograph {\n");
    dot.push_str("  rankdir=LR;\n");
    dot.push_str("  node [fontname=\"Helvetica\", fontsize=10];\n");

    for node in &graph.nodes {
        let _ = writeln!(
            dot,
            "  \"{}\" [label=\"{}\", shape={}];",
            escape_dot(&node.id),
            escape_dot(&node.name),
            shape(node.node_type)
        );
    }
    for edge in &graph.edges {
        let _ = writeln!(
            dot,
            "  \"{}\" -> \"{}\" [label=\"{}\"];",
            escape_dot(&edge.source),
            escape_dot(&edge.target),
            edge.relationship
        );
    }
    dot.push_str("}\n");
    dot
}

/// Export graph in the configured format.
pub fn export_graph(graph: &DependencyGraph, config: &ExportConfig) -> Result<String> {
    match config.format {
        ExportFormat::Json => export_json(graph, config.minify),
        ExportFormat::Dot => Ok(export_dot(graph)),
    }
}

fn shape(node_type: super::NodeType) -> &'static str {
    use super::NodeType;
    match node_type {
        NodeType::Folder => "folder",
        NodeType::File => "note",
        NodeType::Module => "component",
        NodeType::Namespace => "tab",
        NodeType::Class => "box",
        NodeType::Interface => "box3d",
        NodeType::Function => "ellipse",
    }
}

fn escape_dot(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}
