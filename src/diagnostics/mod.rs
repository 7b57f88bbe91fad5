//! Structured diagnostics for scan and extraction operations.
//!
//! Provides deterministic, sortable diagnostic types for skip reasons and errors.

pub mod scan_diagnostics;

pub use scan_diagnostics::{DiagnosticStage, DiagnosticSummary, ScanDiagnostic, SkipReason};
