//! `analyze` command implementation

use anyhow::{Context, Result};
use cartograph::diagnostics::DiagnosticSummary;
use cartograph::graph::graph_metrics;
use cartograph::output::{output_json, AnalyzeResponse};
use std::path::Path;

use crate::cli::GlobalArgs;

/// Entries listed under "most connected" / "most imported"
const TOP_N: usize = 10;

pub fn run_analyze(root: &Path, url: Option<&str>, save: Option<&Path>, global: &GlobalArgs) -> Result<()> {
    let analyzer = crate::build_analyzer(global)?;
    let full = analyzer.analyze_full(root, url)?;
    let metrics = graph_metrics(&full.graph, TOP_N);
    let summary = DiagnosticSummary::from_diagnostics(&full.diagnostics);

    for diagnostic in full.diagnostics.iter().filter(|d| d.is_error()) {
        tracing::warn!("{}", diagnostic.format_stderr());
    }

    let overview = full.overview.clone();
    if let Some(path) = save {
        full.into_cached()
            .save(path)
            .with_context(|| format!("Failed to save analysis to {}", path.display()))?;
        tracing::info!(path = %path.display(), "analysis saved");
    }

    if global.output_format.is_json() {
        let response = AnalyzeResponse {
            root: root.display().to_string(),
            overview,
            metrics,
            summary,
            saved_to: save.map(|p| p.display().to_string()),
        };
        return output_json(response, global.output_format);
    }

    if let Some(url) = &overview.repo_url {
        println!("Repository: {}", url);
    }
    println!(
        "{} files, {} lines, {} bytes",
        overview.total_files, overview.total_lines, overview.total_bytes
    );
    println!();
    println!("Languages:");
    for stat in &overview.languages {
        println!(
            "  {:<12} {:>6} files {:>9} lines {:>6.2}%",
            stat.language, stat.files, stat.lines, stat.percentage
        );
    }
    if !overview.frameworks.is_empty() {
        println!();
        println!("Frameworks: {}", overview.frameworks.join(", "));
    }
    if !overview.entry_points.is_empty() {
        println!("Entry points: {}", overview.entry_points.join(", "));
    }
    println!();
    println!("Symbols:");
    for (kind, count) in &overview.symbol_counts {
        println!("  {:<12} {:>6}", kind, count);
    }
    println!();
    println!("Graph: {} nodes, {} edges", overview.node_count, overview.edge_count);
    if !metrics.most_imported.is_empty() {
        println!("Most imported:");
        for node in &metrics.most_imported {
            println!("  {:<50} {:>4} in", node.id, node.fan_in);
        }
    }
    if !metrics.most_connected.is_empty() {
        println!("Most connected:");
        for node in &metrics.most_connected {
            println!(
                "  {:<50} {:>4} in {:>4} out",
                node.id, node.fan_in, node.fan_out
            );
        }
    }
    println!();
    println!("{} skipped, {} errors", summary.skipped, summary.errors);
    if let Some(path) = save {
        println!("Saved analysis to {}", path.display());
    }
    Ok(())
}
