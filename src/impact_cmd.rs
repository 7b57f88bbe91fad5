//! `impact` command implementation
//!
//! Reads a saved analysis and a JSON array of changed files, then reports
//! the files, symbols and edges a pull request touches.

use anyhow::{Context, Result};
use cartograph::output::output_json;
use cartograph::{AnalysisError, AnalysisStore, ChangedFile};
use std::path::Path;

use crate::cli::GlobalArgs;

fn load_changes(path: &Path) -> Result<Vec<ChangedFile>> {
    let text = std::fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
    let changes: Vec<ChangedFile> = serde_json::from_str(&text)
        .map_err(AnalysisError::from)
        .with_context(|| format!("Failed to parse changed files {}", path.display()))?;
    Ok(changes)
}

pub fn run_impact(analysis: &Path, changes: &Path, pr_number: u64, global: &GlobalArgs) -> Result<()> {
    let cached = crate::search_cmd::load_analysis(analysis)?;
    let changed = load_changes(changes)?;

    let repo_id = analysis.display().to_string();
    let store = AnalysisStore::new();
    store.insert(&repo_id, cached);
    let response = store.analyze_pr_for(&repo_id, pr_number, &changed)?;

    if global.output_format.is_json() {
        return output_json(response, global.output_format);
    }

    println!(
        "PR #{}: {} files, +{} -{}",
        response.pr_number, response.total_files, response.total_additions, response.total_deletions
    );
    if !response.languages.is_empty() {
        println!("Languages: {}", response.languages.join(", "));
    }
    println!();
    for file in &response.files {
        println!(
            "  {:<9} {:<50} {:>4} symbols  +{} -{}",
            file.status.as_str(),
            file.file_path,
            file.symbol_count,
            file.additions,
            file.deletions
        );
    }
    println!();
    println!(
        "{} affected symbols, {} affected edges",
        response.affected_symbols.len(),
        response.affected_edges.len()
    );
    if response.downstream_files.is_empty() {
        println!("No downstream files");
    } else {
        println!("Downstream files:");
        for path in &response.downstream_files {
            println!("  {}", path);
        }
    }
    Ok(())
}
