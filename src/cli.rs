//! CLI argument parsing for cartograph
//!
//! Defines the Command enum and parse_args_from() for all CLI commands.

use anyhow::Result;
use cartograph::{parse_symbol_kind, ExportFormat, OutputFormat, SymbolKind};
use std::path::PathBuf;

/// Default page size for `search`
pub const DEFAULT_TAKE: usize = 20;
/// Default number of suggestions
pub const DEFAULT_SUGGEST_LIMIT: usize = 10;

pub fn print_usage() {
    eprintln!("cartograph - Deterministic repository analysis");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cartograph <command> [arguments]");
    eprintln!("  cartograph --help");
    eprintln!("  cartograph --version");
    eprintln!();
    eprintln!("  cartograph scan --root <DIR>");
    eprintln!("  cartograph symbols --root <DIR> [--kind <KIND>]");
    eprintln!("  cartograph graph --root <DIR> [--format json|dot] [--minify]");
    eprintln!("  cartograph analyze --root <DIR> [--url <URL>] [--save <FILE>]");
    eprintln!("  cartograph search (--root <DIR> | --analysis <FILE>) --query <Q> [--kind <KIND>]... [--skip <N>] [--take <N>]");
    eprintln!("  cartograph suggest (--root <DIR> | --analysis <FILE>) --prefix <P> [--limit <N>]");
    eprintln!("  cartograph kinds (--root <DIR> | --analysis <FILE>)");
    eprintln!("  cartograph impact --analysis <FILE> --changes <FILE> [--pr <N>]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  scan      List the files that would be analyzed");
    eprintln!("  symbols   List extracted symbols");
    eprintln!("  graph     Export the dependency graph");
    eprintln!("  analyze   Full analysis: overview, graph metrics, diagnostics");
    eprintln!("  search    Ranked symbol and file search");
    eprintln!("  suggest   Symbol names starting with a prefix");
    eprintln!("  kinds     Document kinds present in the search index");
    eprintln!("  impact    Impact of a pull request's changed files");
    eprintln!();
    eprintln!("Global arguments:");
    eprintln!("  --output <FORMAT>   Output format: human (default), json (compact), or pretty (formatted)");
    eprintln!("  --config <FILE>     JSON analysis configuration");
    eprintln!("  --verbose           Debug logging (overridden by RUST_LOG)");
    eprintln!();
    eprintln!("Search arguments:");
    eprintln!("  --analysis <FILE>   Cached analysis written by `analyze --save`");
    eprintln!("  --kind <KIND>       Keep only this kind (repeatable, case-insensitive)");
    eprintln!("  --skip <N>          Results to skip (default: 0)");
    eprintln!("  --take <N>          Page size (default: {})", DEFAULT_TAKE);
    eprintln!();
    eprintln!("Impact arguments:");
    eprintln!("  --changes <FILE>    JSON array of changed files");
    eprintln!("                      ({{\"filePath\", \"status\", \"additions\", \"deletions\", \"previousFilePath\"}})");
    eprintln!("  --pr <N>            Pull request number echoed in the response (default: 0)");
}

/// Arguments accepted by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalArgs {
    pub output_format: OutputFormat,
    pub config_path: Option<PathBuf>,
    pub verbose: bool,
}

impl Default for GlobalArgs {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Human,
            config_path: None,
            verbose: false,
        }
    }
}

/// Where an index-backed command reads its symbols from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Analyze a directory now
    Root(PathBuf),
    /// Load a saved `CachedAnalysis`
    Analysis(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Scan {
        root: PathBuf,
    },
    Symbols {
        root: PathBuf,
        kind: Option<SymbolKind>,
    },
    Graph {
        root: PathBuf,
        format: ExportFormat,
        minify: bool,
    },
    Analyze {
        root: PathBuf,
        url: Option<String>,
        save: Option<PathBuf>,
    },
    Search {
        source: Source,
        query: String,
        kinds: Vec<String>,
        skip: usize,
        take: usize,
    },
    Suggest {
        source: Source,
        prefix: String,
        limit: usize,
    },
    Kinds {
        source: Source,
    },
    Impact {
        analysis: PathBuf,
        changes: PathBuf,
        pr_number: u64,
    },
}

/// Result of parsing the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Run { command: Command, global: GlobalArgs },
    Help,
    Version { output_format: OutputFormat },
}

/// Cursor over the arguments following the command name.
struct ArgCursor<'a> {
    args: &'a [String],
    i: usize,
}

impl<'a> ArgCursor<'a> {
    fn next_flag(&mut self) -> Option<&'a str> {
        let flag = self.args.get(self.i)?;
        self.i += 1;
        Some(flag.as_str())
    }

    fn value(&mut self, flag: &str) -> Result<&'a str> {
        let value = self
            .args
            .get(self.i)
            .ok_or_else(|| anyhow::anyhow!("{} requires an argument", flag))?;
        self.i += 1;
        Ok(value.as_str())
    }

    fn number<T: std::str::FromStr>(&mut self, flag: &str) -> Result<T> {
        let raw = self.value(flag)?;
        raw.parse()
            .map_err(|_| anyhow::anyhow!("{} expects a non-negative number, got {}", flag, raw))
    }
}

fn parse_output_format(value: &str) -> Result<OutputFormat> {
    OutputFormat::from_str(value).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid output format: {}. Must be human, json, or pretty",
            value
        )
    })
}

impl GlobalArgs {
    /// Consume `flag` if it is a global argument.
    fn accept(&mut self, flag: &str, cursor: &mut ArgCursor<'_>) -> Result<bool> {
        match flag {
            "--output" => self.output_format = parse_output_format(cursor.value(flag)?)?,
            "--config" => self.config_path = Some(PathBuf::from(cursor.value(flag)?)),
            "--verbose" | "-v" => self.verbose = true,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

fn resolve_source(root: Option<PathBuf>, analysis: Option<PathBuf>) -> Result<Source> {
    match (root, analysis) {
        (Some(_), Some(_)) => Err(anyhow::anyhow!(
            "--root and --analysis are mutually exclusive"
        )),
        (Some(root), None) => Ok(Source::Root(root)),
        (None, Some(analysis)) => Ok(Source::Analysis(analysis)),
        (None, None) => Err(anyhow::anyhow!("--root or --analysis is required")),
    }
}

/// Parse a full argument vector (program name first).
pub fn parse_args_from(args: &[String]) -> Result<Invocation> {
    let Some(command) = args.get(1) else {
        return Err(anyhow::anyhow!("Missing command"));
    };

    match command.as_str() {
        "--help" | "-h" | "help" => return Ok(Invocation::Help),
        "--version" | "-V" => {
            let mut global = GlobalArgs::default();
            let mut cursor = ArgCursor { args, i: 2 };
            while let Some(flag) = cursor.next_flag() {
                if !global.accept(flag, &mut cursor)? {
                    return Err(anyhow::anyhow!("Unknown argument: {}", flag));
                }
            }
            return Ok(Invocation::Version {
                output_format: global.output_format,
            });
        }
        _ => {}
    }

    let mut global = GlobalArgs::default();
    let mut cursor = ArgCursor { args, i: 2 };

    let mut root: Option<PathBuf> = None;
    let mut analysis: Option<PathBuf> = None;
    let mut kind: Option<SymbolKind> = None;
    let mut kinds: Vec<String> = Vec::new();
    let mut format = ExportFormat::Json;
    let mut minify = false;
    let mut url: Option<String> = None;
    let mut save: Option<PathBuf> = None;
    let mut query: Option<String> = None;
    let mut prefix: Option<String> = None;
    let mut skip = 0usize;
    let mut take = DEFAULT_TAKE;
    let mut limit = DEFAULT_SUGGEST_LIMIT;
    let mut changes: Option<PathBuf> = None;
    let mut pr_number = 0u64;

    let accepts_analysis = matches!(
        command.as_str(),
        "search" | "suggest" | "kinds" | "impact"
    );

    while let Some(flag) = cursor.next_flag() {
        if global.accept(flag, &mut cursor)? {
            continue;
        }
        match (command.as_str(), flag) {
            (c, "--root") if c != "impact" => root = Some(PathBuf::from(cursor.value(flag)?)),
            (_, "--analysis") if accepts_analysis => {
                analysis = Some(PathBuf::from(cursor.value(flag)?))
            }
            ("symbols", "--kind") => {
                let raw = cursor.value(flag)?;
                kind = Some(
                    parse_symbol_kind(raw)
                        .ok_or_else(|| anyhow::anyhow!("Unknown symbol kind: {}", raw))?,
                );
            }
            ("search", "--kind") => kinds.push(cursor.value(flag)?.to_string()),
            ("search", "--query") => query = Some(cursor.value(flag)?.to_string()),
            ("search", "--skip") => skip = cursor.number(flag)?,
            ("search", "--take") => take = cursor.number(flag)?,
            ("graph", "--format") => {
                let raw = cursor.value(flag)?;
                format = ExportFormat::from_str(raw).ok_or_else(|| {
                    anyhow::anyhow!("Invalid export format: {}. Must be json or dot", raw)
                })?;
            }
            ("graph", "--minify") => minify = true,
            ("analyze", "--url") => url = Some(cursor.value(flag)?.to_string()),
            ("analyze", "--save") => save = Some(PathBuf::from(cursor.value(flag)?)),
            ("suggest", "--prefix") => prefix = Some(cursor.value(flag)?.to_string()),
            ("suggest", "--limit") => limit = cursor.number(flag)?,
            ("impact", "--changes") => changes = Some(PathBuf::from(cursor.value(flag)?)),
            ("impact", "--pr") => pr_number = cursor.number(flag)?,
            _ => return Err(anyhow::anyhow!("Unknown argument: {}", flag)),
        }
    }

    let require_root = |root: Option<PathBuf>| root.ok_or_else(|| anyhow::anyhow!("--root is required"));

    let command = match command.as_str() {
        "scan" => Command::Scan {
            root: require_root(root)?,
        },
        "symbols" => Command::Symbols {
            root: require_root(root)?,
            kind,
        },
        "graph" => Command::Graph {
            root: require_root(root)?,
            format,
            minify,
        },
        "analyze" => Command::Analyze {
            root: require_root(root)?,
            url,
            save,
        },
        "search" => Command::Search {
            source: resolve_source(root, analysis)?,
            query: query.ok_or_else(|| anyhow::anyhow!("--query is required"))?,
            kinds,
            skip,
            take,
        },
        "suggest" => Command::Suggest {
            source: resolve_source(root, analysis)?,
            prefix: prefix.ok_or_else(|| anyhow::anyhow!("--prefix is required"))?,
            limit,
        },
        "kinds" => Command::Kinds {
            source: resolve_source(root, analysis)?,
        },
        "impact" => Command::Impact {
            analysis: analysis.ok_or_else(|| anyhow::anyhow!("--analysis is required"))?,
            changes: changes.ok_or_else(|| anyhow::anyhow!("--changes is required"))?,
            pr_number,
        },
        other => return Err(anyhow::anyhow!("Unknown command: {}", other)),
    };

    Ok(Invocation::Run { command, global })
}

/// Best-effort `--output` lookup for reporting errors that happen before
/// (or during) parsing.
pub fn sniff_output_format(args: &[String]) -> OutputFormat {
    args.iter()
        .position(|arg| arg == "--output")
        .and_then(|i| args.get(i + 1))
        .and_then(|format| OutputFormat::from_str(format))
        .unwrap_or(OutputFormat::Human)
}
