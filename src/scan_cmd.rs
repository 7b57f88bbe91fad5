//! `scan` and `symbols` command implementations

use anyhow::Result;
use cartograph::diagnostics::DiagnosticSummary;
use cartograph::output::{output_json, ScanResponse, SymbolsResponse};
use cartograph::SymbolKind;
use std::path::Path;

use crate::cli::GlobalArgs;

pub fn run_scan(root: &Path, global: &GlobalArgs) -> Result<()> {
    let analyzer = crate::build_analyzer(global)?;
    let report = analyzer.scan(root)?;
    let summary = DiagnosticSummary::from_diagnostics(&report.diagnostics);

    if global.output_format.is_json() {
        let response = ScanResponse {
            root: root.display().to_string(),
            files: report.files,
            summary,
            diagnostics: report.diagnostics,
        };
        return output_json(response, global.output_format);
    }

    for file in &report.files {
        println!(
            "{:<60} {:<12} {:>8} lines {:>10} bytes",
            file.relative_path,
            file.language.as_str(),
            file.line_count,
            file.size_bytes
        );
    }
    for diagnostic in report.diagnostics.iter().filter(|d| d.is_error() || global.verbose) {
        eprintln!("{}", diagnostic.format_stderr());
    }
    println!();
    println!(
        "{} files, {} skipped, {} errors",
        report.files.len(),
        summary.skipped,
        summary.errors
    );
    Ok(())
}

pub fn run_symbols(root: &Path, kind: Option<SymbolKind>, global: &GlobalArgs) -> Result<()> {
    let analyzer = crate::build_analyzer(global)?;
    let mut symbols = analyzer.extract_symbols(root)?;
    if let Some(kind) = kind {
        symbols.retain(|symbol| symbol.kind == kind);
    }

    if global.output_format.is_json() {
        let response = SymbolsResponse {
            root: root.display().to_string(),
            kind: kind.map(|k| k.as_str().to_string()),
            count: symbols.len(),
            symbols,
        };
        return output_json(response, global.output_format);
    }

    for symbol in &symbols {
        match &symbol.parent_symbol {
            Some(parent) => println!(
                "{}:{}  {} {}.{}",
                symbol.file_path, symbol.line, symbol.kind, parent, symbol.name
            ),
            None => println!(
                "{}:{}  {} {}",
                symbol.file_path, symbol.line, symbol.kind, symbol.name
            ),
        }
    }
    println!();
    println!("{} symbols", symbols.len());
    Ok(())
}
