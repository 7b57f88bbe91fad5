//! Version and build information for cartograph
//!
//! Build metadata (commit SHA, build date, rustc version) is injected by
//! `build.rs`; every field reads "unknown" when it was not available.

use serde::{Deserialize, Serialize};

/// Full version string including build metadata
///
/// Format: "cartograph {version} ({commit} {date}) rustc {rustc_version}"
pub fn version() -> String {
    format!(
        "cartograph {} ({} {}) rustc {}",
        package_version(),
        build_commit(),
        build_date(),
        rustc_version()
    )
}

/// Package version (e.g., "0.4.0")
pub fn package_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub fn build_commit() -> &'static str {
    option_env!("CARTOGRAPH_COMMIT_SHA").unwrap_or("unknown")
}

pub fn build_date() -> &'static str {
    option_env!("CARTOGRAPH_BUILD_DATE").unwrap_or("unknown")
}

/// Rust compiler version used for the build
pub fn rustc_version() -> &'static str {
    option_env!("CARTOGRAPH_RUSTC_VERSION").unwrap_or("unknown")
}

/// Build metadata as reported by `cartograph --version --output json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub commit: String,
    pub build_date: String,
    pub rustc: String,
    /// Ids of the built-in language profiles
    pub profiles: Vec<String>,
}

impl VersionInfo {
    pub fn current() -> Self {
        Self {
            version: package_version().to_string(),
            commit: build_commit().to_string(),
            build_date: build_date().to_string(),
            rustc: rustc_version().to_string(),
            profiles: crate::ingest::profiles::all()
                .iter()
                .map(|profile| profile.id.to_string())
                .collect(),
        }
    }
}
