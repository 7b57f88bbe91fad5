//! Graph assembly: file tree plus every profile's output.

use std::collections::BTreeSet;

use crate::common::{file_name, parent_dir};
use crate::ingest::ProfileOutput;
use crate::scan::FileInfo;

use super::builder::GraphBuilder;
use super::model::{ids, DependencyGraph, GraphNode, NodeType, Relationship};

/// Build the repository graph.
///
/// Insertion order, and therefore which duplicate id wins:
/// 1. folders, sorted (root folder `folder:.` first)
/// 2. files, sorted
/// 3. profile outputs in the order given (registry order)
///
/// # Arguments
/// * `files` - Scanned inventory
/// * `outputs` - One output per profile
pub fn assemble<'a>(
    files: &[FileInfo],
    outputs: impl IntoIterator<Item = &'a ProfileOutput>,
) -> DependencyGraph {
    let mut builder = GraphBuilder::new();

    let mut folders = BTreeSet::new();
    for file in files {
        let mut dir = parent_dir(&file.relative_path);
        loop {
            if !folders.insert(dir) || dir.is_empty() {
                break;
            }
            dir = parent_dir(dir);
        }
    }

    for dir in &folders {
        let name = if dir.is_empty() { "." } else { file_name(dir) };
        builder.add_node(
            GraphNode::new(ids::folder(dir), name, NodeType::Folder).with_meta("path", *dir),
        );
        if !dir.is_empty() {
            builder.add_edge(ids::folder(parent_dir(dir)), ids::folder(dir), Relationship::Contains);
        }
    }

    let mut sorted: Vec<&FileInfo> = files.iter().collect();
    sorted.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    for file in sorted {
        let path = file.relative_path.as_str();
        builder.add_node(
            GraphNode::new(ids::file(path), file_name(path), NodeType::File)
                .with_file(path)
                .with_meta("language", file.language.as_str())
                .with_meta("lines", file.line_count.to_string())
                .with_meta("size", file.size_bytes.to_string()),
        );
        builder.add_edge(ids::folder(parent_dir(path)), ids::file(path), Relationship::Contains);
    }

    let mut profiles = 0usize;
    for output in outputs {
        builder.extend(&output.nodes, &output.edges);
        profiles += 1;
    }

    tracing::debug!(
        folders = folders.len(),
        files = files.len(),
        profiles,
        nodes = builder.node_count(),
        edges = builder.edge_count(),
        "graph assembled"
    );
    builder.build()
}
