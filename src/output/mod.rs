//! JSON output module for CLI commands
//!
//! Provides schema-versioned response types for every command.

pub mod command;

pub use command::{
    generate_execution_id, output_json, render_json, AnalyzeResponse, ErrorResponse, JsonResponse,
    KindsResponse, OutputFormat, ScanResponse, SearchResponse, SuggestResponse, SymbolsResponse,
};
