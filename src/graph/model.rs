//! Dependency graph data model and node id scheme.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Type of a graph node.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeType {
    File,
    Folder,
    Module,
    Class,
    Interface,
    Function,
    Namespace,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::File => "File",
            NodeType::Folder => "Folder",
            NodeType::Module => "Module",
            NodeType::Class => "Class",
            NodeType::Interface => "Interface",
            NodeType::Function => "Function",
            NodeType::Namespace => "Namespace",
        }
    }

    /// Whether nodes of this type can be the target of an inheritance edge.
    pub fn is_type(&self) -> bool {
        matches!(self, NodeType::Class | NodeType::Interface)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship carried by a graph edge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Relationship {
    Contains,
    Imports,
    Inherits,
    Implements,
}

impl Relationship {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::Contains => "Contains",
            Relationship::Imports => "Imports",
            Relationship::Inherits => "Inherits",
            Relationship::Implements => "Implements",
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the dependency graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Namespaced key, see [`ids`]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Defining file; `None` for folders and shared namespace nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type,
            file_path: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_file(mut self, file_path: impl Into<String>) -> Self {
        self.file_path = Some(file_path.into());
        self
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

/// A directed edge of the dependency graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub relationship: Relationship,
}

impl GraphEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, relationship: Relationship) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relationship,
        }
    }
}

/// Assembled repository graph.
///
/// Node ids are unique. Edges are kept exactly as emitted and may repeat.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DependencyGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl DependencyGraph {
    /// Lookup table from node id to node.
    pub fn node_index(&self) -> HashMap<&str, &GraphNode> {
        self.nodes.iter().map(|n| (n.id.as_str(), n)).collect()
    }

    /// Find a node by id (linear scan; use [`node_index`](Self::node_index) for bulk lookups).
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edges_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |e| e.source == id)
    }

    pub fn edges_to<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |e| e.target == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Node id construction.
///
/// Ids are namespaced by kind so identically named symbols in different files
/// never collide. Namespace ids are deliberately shared across files.
pub mod ids {
    /// File node id: the relative path itself.
    pub fn file(rel_path: &str) -> String {
        rel_path.to_string()
    }

    /// Folder node id; the repository root is `folder:.`.
    pub fn folder(dir: &str) -> String {
        if dir.is_empty() {
            "folder:.".to_string()
        } else {
            format!("folder:{}", dir)
        }
    }

    pub fn module(rel_path: &str) -> String {
        format!("module:{}", rel_path)
    }

    pub fn class(logical_path: &str, qualified_name: &str) -> String {
        format!("class:{}.{}", logical_path, qualified_name)
    }

    pub fn interface(logical_path: &str, qualified_name: &str) -> String {
        format!("interface:{}.{}", logical_path, qualified_name)
    }

    pub fn function(logical_path: &str, name: &str) -> String {
        format!("func:{}.{}", logical_path, name)
    }

    pub fn namespace(qualified_name: &str) -> String {
        format!("ns:{}", qualified_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_json_uses_type_key() {
        let node = GraphNode::new("module:a.go", "a.go", NodeType::Module).with_file("a.go");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "Module");
        assert_eq!(json["filePath"], "a.go");
    }

    #[test]
    fn test_edge_deserializes_from_plain_json() {
        let edge: GraphEdge =
            serde_json::from_str(r#"{"source":"b.go","target":"a.go","relationship":"Imports"}"#)
                .unwrap();
        assert_eq!(edge.relationship, Relationship::Imports);
    }

    #[test]
    fn test_ids() {
        assert_eq!(ids::folder(""), "folder:.");
        assert_eq!(ids::folder("src/app"), "folder:src/app");
        assert_eq!(ids::class("src/models/user", "User"), "class:src/models/user.User");
        assert_eq!(ids::function("main", "run"), "func:main.run");
        assert_eq!(ids::namespace("App.Core"), "ns:App.Core");
    }

    #[test]
    fn test_edges_from_and_to() {
        let graph = DependencyGraph {
            nodes: vec![],
            edges: vec![
                GraphEdge::new("a", "b", Relationship::Imports),
                GraphEdge::new("a", "c", Relationship::Imports),
                GraphEdge::new("c", "b", Relationship::Inherits),
            ],
        };
        assert_eq!(graph.edges_from("a").count(), 2);
        assert_eq!(graph.edges_to("b").count(), 2);
    }
}
