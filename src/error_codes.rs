//! Cartograph error codes
//!
//! Error codes follow the pattern: CART-{CATEGORY}-{3-digit number}
//!
//! Categories:
//! - REPO: Repository lookup errors (missing path, unknown id)
//! - IO: I/O and serialization errors
//! - CFG: Configuration errors
//! - ARG: Command-line argument errors
//! - RUN: Run-control errors (cancellation)
//!
//! Each error code is stable and should not be reused.

/// Repository path was not supplied
pub const CART_REPO_001_MISSING_PATH: &str = "CART-REPO-001";

/// Repository root does not exist
pub const CART_REPO_002_NOT_FOUND: &str = "CART-REPO-002";

/// No index or analysis registered under the id
pub const CART_REPO_003_UNKNOWN_ID: &str = "CART-REPO-003";

/// Filesystem failure
pub const CART_IO_001_IO_ERROR: &str = "CART-IO-001";

/// JSON encode/decode failure
pub const CART_IO_002_SERIALIZATION: &str = "CART-IO-002";

/// Invalid configuration value or glob pattern
pub const CART_CFG_001_INVALID_CONFIG: &str = "CART-CFG-001";

/// Invalid or missing command-line argument
pub const CART_ARG_001_INVALID_ARGS: &str = "CART-ARG-001";

/// Operation was cancelled
pub const CART_RUN_001_CANCELLED: &str = "CART-RUN-001";

/// Error code documentation
///
/// | Code | Description | Remediation |
/// |------|-------------|-------------|
/// | CART-REPO-001 | Repository path missing | Pass `--root <DIR>` |
/// | CART-REPO-002 | Repository not found | Check the directory exists |
/// | CART-REPO-003 | Unknown repository id | Run `cartograph analyze --save` first |
/// | CART-IO-001 | I/O error | Check file/directory read permissions |
/// | CART-IO-002 | Serialization failed | Check the JSON file is a cartograph analysis |
/// | CART-CFG-001 | Invalid configuration | Check `--config` values and glob syntax |
/// | CART-ARG-001 | Invalid arguments | See `cartograph --help` |
/// | CART-RUN-001 | Cancelled | Re-run the command |
pub const ERROR_CODE_DOCUMENTATION: &str = "Error code documentation available in source";

/// Every code, for uniqueness checks and `--help` listings.
pub const ALL_CODES: &[&str] = &[
    CART_REPO_001_MISSING_PATH,
    CART_REPO_002_NOT_FOUND,
    CART_REPO_003_UNKNOWN_ID,
    CART_IO_001_IO_ERROR,
    CART_IO_002_SERIALIZATION,
    CART_CFG_001_INVALID_CONFIG,
    CART_ARG_001_INVALID_ARGS,
    CART_RUN_001_CANCELLED,
];
