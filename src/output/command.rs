//! JSON output types for CLI commands
//!
//! Every command response is wrapped in a [`JsonResponse`] carrying a schema
//! version, an execution id and a timestamp, so consumers can parse output
//! from different cartograph releases safely.

use serde::{Deserialize, Serialize};

use crate::diagnostics::{DiagnosticSummary, ScanDiagnostic};
use crate::graph::{GraphMetrics, RepositoryOverview};
use crate::ingest::Symbol;
use crate::scan::FileInfo;
use crate::search::SearchResult;

/// Current JSON output schema version
pub const CARTOGRAPH_JSON_SCHEMA_VERSION: &str = "1.0.0";

/// Wrapper for all JSON responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse<T> {
    /// Schema version for parsing stability
    pub schema_version: String,
    /// Unique execution ID for this run
    pub execution_id: String,
    pub tool: String,
    /// RFC 3339, second precision
    pub timestamp: String,
    /// Response data
    pub data: T,
    /// Whether the response is partial (e.g., truncated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial: Option<bool>,
}

impl<T> JsonResponse<T> {
    /// Create a new JSON response
    pub fn new(data: T, execution_id: &str) -> Self {
        JsonResponse {
            schema_version: CARTOGRAPH_JSON_SCHEMA_VERSION.to_string(),
            execution_id: execution_id.to_string(),
            tool: "cartograph".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            data,
            partial: None,
        }
    }

    /// Mark the response as partial
    pub fn with_partial(mut self, partial: bool) -> Self {
        self.partial = Some(partial);
        self
    }
}

/// Response for `scan`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResponse {
    pub root: String,
    pub files: Vec<FileInfo>,
    pub summary: DiagnosticSummary,
    pub diagnostics: Vec<ScanDiagnostic>,
}

/// Response for `symbols`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolsResponse {
    pub root: String,
    /// Kind filter, if one was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub count: usize,
    pub symbols: Vec<Symbol>,
}

/// Response for `analyze`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub root: String,
    pub overview: RepositoryOverview,
    pub metrics: GraphMetrics,
    pub summary: DiagnosticSummary,
    /// Where the cached analysis was written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<String>,
}

/// Response for `search`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub kinds: Vec<String>,
    pub skip: usize,
    pub take: usize,
    pub total: usize,
    pub results: Vec<SearchResult>,
}

/// Response for `suggest`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestResponse {
    pub prefix: String,
    pub suggestions: Vec<String>,
}

/// Response for `kinds`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KindsResponse {
    pub kinds: Vec<String>,
}

/// Response for errors in JSON mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable error code (`CART-...`)
    pub error: String,
    /// Human-readable error message
    pub message: String,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output
    Human,
    /// Compact JSON with schema versioning
    Json,
    /// Indented JSON with schema versioning
    Pretty,
}

impl OutputFormat {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Some(OutputFormat::Human),
            "json" => Some(OutputFormat::Json),
            "pretty" => Some(OutputFormat::Pretty),
            _ => None,
        }
    }

    pub fn is_json(&self) -> bool {
        !matches!(self, OutputFormat::Human)
    }
}

/// Generate a unique execution ID for this run
///
/// Uses timestamp + process ID for uniqueness.
pub fn generate_execution_id() -> String {
    let timestamp = chrono::Utc::now().timestamp_millis();
    format!("{:x}-{:x}", timestamp, std::process::id())
}

/// Render a response in the given JSON format.
pub fn render_json<T: Serialize>(data: &T, format: OutputFormat) -> anyhow::Result<String> {
    let json = if format == OutputFormat::Pretty {
        serde_json::to_string_pretty(data)?
    } else {
        serde_json::to_string(data)?
    };
    Ok(json)
}

/// Wrap `data` in a [`JsonResponse`] and print it to stdout.
pub fn output_json<T: Serialize>(data: T, format: OutputFormat) -> anyhow::Result<()> {
    let response = JsonResponse::new(data, &generate_execution_id());
    println!("{}", render_json(&response, format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("text"), Some(OutputFormat::Human));
        assert_eq!(OutputFormat::from_str("pretty"), Some(OutputFormat::Pretty));
        assert_eq!(OutputFormat::from_str("xml"), None);
        assert!(!OutputFormat::Human.is_json());
    }

    #[test]
    fn test_envelope_fields() {
        let response = JsonResponse::new(KindsResponse { kinds: vec!["Class".into()] }, "abc-1");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["schema_version"], CARTOGRAPH_JSON_SCHEMA_VERSION);
        assert_eq!(value["execution_id"], "abc-1");
        assert_eq!(value["tool"], "cartograph");
        assert_eq!(value["data"]["kinds"][0], "Class");
        assert!(value.get("partial").is_none());
        assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_render_compact_and_pretty() {
        let data = SuggestResponse {
            prefix: "Pa".into(),
            suggestions: vec!["Parser".into()],
        };
        assert!(!render_json(&data, OutputFormat::Json).unwrap().contains('\n'));
        assert!(render_json(&data, OutputFormat::Pretty).unwrap().contains('\n'));
    }

    #[test]
    fn test_execution_id_shape() {
        let id = generate_execution_id();
        let (ts, pid) = id.split_once('-').unwrap();
        assert!(u64::from_str_radix(ts, 16).is_ok());
        assert!(u32::from_str_radix(pid, 16).is_ok());
    }
}
