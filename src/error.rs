//! Error type shared by every analysis entry point.
//!
//! Per-file problems never surface here: they are recorded as
//! [`ScanDiagnostic`](crate::diagnostics::ScanDiagnostic) values and the
//! file is skipped. Only whole-operation failures become an `AnalysisError`.

use std::path::PathBuf;

/// Failure of a whole analysis operation.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The caller's cancellation token fired.
    #[error("analysis cancelled")]
    Cancelled,

    /// An analysis was requested without a repository path.
    #[error("repository path is missing")]
    MissingRepositoryPath,

    /// The repository root does not exist or is not a directory.
    #[error("repository not found: {}", .0.display())]
    RepositoryNotFound(PathBuf),

    /// Filesystem failure that affects the whole operation.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration value or pattern.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// JSON encoding or decoding failed.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No index or analysis is registered under the given id.
    #[error("unknown repository id: {0}")]
    UnknownRepository(String),
}

impl AnalysisError {
    /// Wrap an I/O error with the path that produced it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }

    /// Stable error code for JSON error responses.
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::Cancelled => crate::error_codes::CART_RUN_001_CANCELLED,
            AnalysisError::MissingRepositoryPath => crate::error_codes::CART_REPO_001_MISSING_PATH,
            AnalysisError::RepositoryNotFound(_) => crate::error_codes::CART_REPO_002_NOT_FOUND,
            AnalysisError::Io { .. } => crate::error_codes::CART_IO_001_IO_ERROR,
            AnalysisError::Config(_) => crate::error_codes::CART_CFG_001_INVALID_CONFIG,
            AnalysisError::Serialization(_) => crate::error_codes::CART_IO_002_SERIALIZATION,
            AnalysisError::UnknownRepository(_) => crate::error_codes::CART_REPO_003_UNKNOWN_ID,
        }
    }
}

/// Result alias used across the library.
pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_not_found_message() {
        let err = AnalysisError::RepositoryNotFound(PathBuf::from("/no/such/repo"));
        assert_eq!(err.to_string(), "repository not found: /no/such/repo");
        assert_eq!(err.code(), "CART-REPO-002");
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err = AnalysisError::io(
            "a.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("a.txt"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
