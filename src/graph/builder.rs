//! Append-only graph accumulation with first-writer-wins node ids.

use std::collections::HashSet;

use super::model::{DependencyGraph, GraphEdge, GraphNode, Relationship};

/// Accumulates nodes and edges into a [`DependencyGraph`].
///
/// # Guarantees
/// - A node whose id is already present is dropped, never overwritten
/// - Edges are appended in insertion order, repeats included
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<GraphNode>,
    seen: HashSet<String>,
    edges: Vec<GraphEdge>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node unless its id is taken.
    ///
    /// # Returns
    /// `true` if the node was inserted
    pub fn add_node(&mut self, node: GraphNode) -> bool {
        if self.seen.contains(&node.id) {
            return false;
        }
        self.seen.insert(node.id.clone());
        self.nodes.push(node);
        true
    }

    pub fn add_edge(&mut self, source: impl Into<String>, target: impl Into<String>, relationship: Relationship) {
        self.edges.push(GraphEdge::new(source, target, relationship));
    }

    pub fn push_edge(&mut self, edge: GraphEdge) {
        self.edges.push(edge);
    }

    /// Merge a batch of nodes (deduplicated) and edges (appended).
    pub fn extend<'a>(
        &mut self,
        nodes: impl IntoIterator<Item = &'a GraphNode>,
        edges: impl IntoIterator<Item = &'a GraphEdge>,
    ) {
        for node in nodes {
            if !self.seen.contains(&node.id) {
                self.add_node(node.clone());
            }
        }
        self.edges.extend(edges.into_iter().cloned());
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Nodes inserted so far, in insertion order.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn into_parts(self) -> (Vec<GraphNode>, Vec<GraphEdge>) {
        (self.nodes, self.edges)
    }

    pub fn build(self) -> DependencyGraph {
        DependencyGraph {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeType;

    #[test]
    fn test_duplicate_id_is_dropped_not_overwritten() {
        let mut builder = GraphBuilder::new();
        assert!(builder.add_node(GraphNode::new("ns:App", "App", NodeType::Namespace).with_file("a.cs")));
        assert!(!builder.add_node(GraphNode::new("ns:App", "App", NodeType::Namespace).with_file("b.cs")));

        let graph = builder.build();
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.nodes[0].file_path.as_deref(), Some("a.cs"));
    }

    #[test]
    fn test_edges_are_not_deduplicated() {
        let mut builder = GraphBuilder::new();
        builder.add_edge("a", "b", Relationship::Imports);
        builder.add_edge("a", "b", Relationship::Imports);
        assert_eq!(builder.build().edges.len(), 2);
    }

    #[test]
    fn test_extend_keeps_first_writer() {
        let first = vec![GraphNode::new("x", "first", NodeType::Module)];
        let second = vec![
            GraphNode::new("x", "second", NodeType::Module),
            GraphNode::new("y", "y", NodeType::Module),
        ];
        let edges = vec![GraphEdge::new("y", "x", Relationship::Imports)];

        let mut builder = GraphBuilder::new();
        builder.extend(&first, &[]);
        builder.extend(&second, &edges);

        let graph = builder.build();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[0].name, "first");
        assert_eq!(graph.edges.len(), 1);
    }
}
