//! `graph` command implementation
//!
//! Writes the assembled dependency graph to stdout as JSON or Graphviz DOT.
//! The graph is the payload itself, so no JSON envelope is added.

use anyhow::Result;
use cartograph::graph::export_graph;
use cartograph::{ExportConfig, ExportFormat};
use std::path::Path;

use crate::cli::GlobalArgs;

pub fn run_graph(root: &Path, format: ExportFormat, minify: bool, global: &GlobalArgs) -> Result<()> {
    let analyzer = crate::build_analyzer(global)?;
    let graph = analyzer.build_dependency_graph(root)?;
    tracing::debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "exporting graph"
    );

    let config = ExportConfig::new(format).with_minify(minify);
    println!("{}", export_graph(&graph, &config)?);
    Ok(())
}
