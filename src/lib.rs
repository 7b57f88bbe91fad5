//! Cartograph: deterministic repository analysis
//!
//! Cartograph walks a source tree once, extracts declarations with
//! line-oriented language profiles and assembles them into a dependency
//! graph. The same extraction feeds a BM25 search index and a PR impact
//! query over the cached result.
//!
//! # Pipeline
//!
//! 1. [`scan`] inventories candidate files, honoring ignore rules and size limits.
//! 2. [`ingest`] runs every language profile over the inventory.
//! 3. [`graph`] merges the file tree and profile outputs into one graph.
//! 4. [`search`] and [`impact`] answer queries over the assembled result.
//!
//! # Position Conventions
//!
//! Symbol lines are 1-indexed. File documents in the search index carry line 0.
//!
//! ```no_run
//! use std::path::Path;
//!
//! let analysis = cartograph::analyze_full(Path::new("."), None)?;
//! println!("{} symbols", analysis.symbols.len());
//! # Ok::<(), cartograph::AnalysisError>(())
//! ```

pub mod analysis;
pub mod cancel;
pub mod collaborators;
pub mod common;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod error_codes;
pub mod graph;
pub mod impact;
pub mod ingest;
pub mod output;
pub mod scan;
pub mod search;
pub mod version;

pub use analysis::{
    analyze_full, build_dependency_graph, extract_symbols, scan_files, AnalysisStore, Analyzer,
    CachedAnalysis, FullAnalysis,
};
pub use cancel::CancellationToken;
pub use collaborators::{
    AnalysisStage, LocalSource, NoProgress, ProgressEntry, ProgressSink, ProgressTracker,
    RepositorySource, Summarizer,
};
pub use common::{format_symbol_kind, parse_symbol_kind};
pub use config::{AnalysisConfig, SearchConfig};
pub use diagnostics::{DiagnosticStage, DiagnosticSummary, ScanDiagnostic, SkipReason};
pub use error::{AnalysisError, Result};
pub use graph::{
    DependencyGraph, ExportConfig, ExportFormat, GraphEdge, GraphMetrics, GraphNode, NodeType,
    Relationship, RepositoryOverview,
};
pub use impact::{analyze_pr_impact, ChangeStatus, ChangedFile, PrImpactResponse};
pub use ingest::{ExtractionCache, Language, Symbol, SymbolKind};
pub use output::{generate_execution_id, JsonResponse, OutputFormat};
pub use scan::{scan_files_with, FileInfo, ScanReport};
pub use search::{IndexRegistry, SearchIndex, SearchPage, SearchResult};
