//! cartograph CLI - deterministic repository analysis
//!
//! Usage: cartograph <command> [arguments]

mod analyze_cmd;
mod cli;
mod graph_cmd;
mod impact_cmd;
mod progress;
mod scan_cmd;
mod search_cmd;

use anyhow::{Context, Result};
use cartograph::error_codes::{CART_ARG_001_INVALID_ARGS, CART_IO_001_IO_ERROR};
use cartograph::output::{output_json, ErrorResponse};
use cartograph::version::VersionInfo;
use cartograph::{AnalysisConfig, AnalysisError, Analyzer, OutputFormat};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use cli::{Command, GlobalArgs, Invocation};

/// Exit status for argument errors
const EXIT_USAGE: u8 = 2;
/// Exit status for failed commands
const EXIT_FAILURE: u8 = 1;

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_directive = if verbose { "cartograph=debug" } else { "cartograph=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Configuration from `--config`, or the defaults.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<AnalysisConfig> {
    match &global.config_path {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(AnalysisConfig::default()),
    }
}

/// Analyzer for `global`, with a progress bar in human mode.
pub(crate) fn build_analyzer(global: &GlobalArgs) -> Result<Analyzer> {
    let analyzer = Analyzer::new(load_config(global)?);
    if global.output_format.is_json() {
        Ok(analyzer)
    } else {
        Ok(analyzer.with_progress(Arc::new(progress::TerminalProgress::new())))
    }
}

fn run_command(command: Command, global: &GlobalArgs) -> Result<()> {
    match command {
        Command::Scan { root } => scan_cmd::run_scan(&root, global),
        Command::Symbols { root, kind } => scan_cmd::run_symbols(&root, kind, global),
        Command::Graph {
            root,
            format,
            minify,
        } => graph_cmd::run_graph(&root, format, minify, global),
        Command::Analyze { root, url, save } => {
            analyze_cmd::run_analyze(&root, url.as_deref(), save.as_deref(), global)
        }
        Command::Search {
            source,
            query,
            kinds,
            skip,
            take,
        } => search_cmd::run_search(&source, &query, &kinds, skip, take, global),
        Command::Suggest {
            source,
            prefix,
            limit,
        } => search_cmd::run_suggest(&source, &prefix, limit, global),
        Command::Kinds { source } => search_cmd::run_kinds(&source, global),
        Command::Impact {
            analysis,
            changes,
            pr_number,
        } => impact_cmd::run_impact(&analysis, &changes, pr_number, global),
    }
}

/// Print `err` on stderr, or as an [`ErrorResponse`] on stdout in JSON mode.
fn report_error(err: &anyhow::Error, code: &str, format: OutputFormat) {
    if format.is_json() {
        let response = ErrorResponse {
            error: code.to_string(),
            message: format!("{:#}", err),
        };
        if output_json(response, format).is_ok() {
            return;
        }
    }
    eprintln!("Error: {:#}", err);
}

fn error_code(err: &anyhow::Error) -> &'static str {
    err.downcast_ref::<AnalysisError>()
        .map(AnalysisError::code)
        .unwrap_or(CART_IO_001_IO_ERROR)
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let invocation = match cli::parse_args_from(&args) {
        Ok(invocation) => invocation,
        Err(e) => {
            let format = cli::sniff_output_format(&args);
            report_error(&e, CART_ARG_001_INVALID_ARGS, format);
            if !format.is_json() {
                cli::print_usage();
            }
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let (command, global) = match invocation {
        Invocation::Help => {
            cli::print_usage();
            return ExitCode::SUCCESS;
        }
        Invocation::Version { output_format } => {
            if output_format.is_json() {
                if let Err(e) = output_json(VersionInfo::current(), output_format) {
                    eprintln!("Error: {:#}", e);
                    return ExitCode::from(EXIT_FAILURE);
                }
            } else {
                println!("{}", cartograph::version::version());
            }
            return ExitCode::SUCCESS;
        }
        Invocation::Run { command, global } => (command, global),
    };

    init_logging(global.verbose);

    match run_command(command, &global) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            report_error(&e, error_code(&e), global.output_format);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
