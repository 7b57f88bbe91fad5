//! Repository dependency graph.
//!
//! [`model`] defines nodes, edges and the id scheme; [`builder`] enforces
//! first-writer-wins node ids; [`assemble`] merges the file tree with every
//! profile's output. [`overview`], [`metrics`] and [`export`] are pure
//! functions over an assembled graph.

pub mod assemble;
pub mod builder;
pub mod export;
pub mod metrics;
pub mod model;
pub mod overview;

pub use assemble::assemble;
pub use builder::GraphBuilder;
pub use export::{export_dot, export_graph, export_json, ExportConfig, ExportFormat};
pub use metrics::{graph_metrics, GraphMetrics, NodeDegree};
pub use model::{ids, DependencyGraph, GraphEdge, GraphNode, NodeType, Relationship};
pub use overview::{overview, LanguageStat, RepositoryOverview};
