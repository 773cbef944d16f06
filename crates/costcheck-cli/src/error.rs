//! Error handling for the costcheck CLI.
//!
//! `CliError` is the top-level error returned by commands. Browser failures
//! keep their `BrowserError` so the flow can tell a wait timeout (which gets
//! a diagnostic screenshot) from everything else. `main` turns whatever
//! escapes into a miette report.

use costcheck_browser::BrowserError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration loading or validation failed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A browser operation failed (launch, navigation, wait, assertion)
    #[error(transparent)]
    Browser(#[from] BrowserError),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The verification run finished with a failure and `failOnError` is set
    #[error("Verification failed: {0}")]
    Verification(String),
}

impl CliError {
    /// Returns true if this error is a browser wait timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, CliError::Browser(e) if e.is_timeout())
    }
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file doesn't exist
    #[error("Config file not found: {}\n\nHint: Create costcheck.json or drop the --config flag", .0.display())]
    NotFound(PathBuf),

    /// Missing required configuration field
    #[error("Missing required field: {field}\n\nHint: {hint}")]
    MissingField {
        /// Name of the missing field
        field: String,
        /// Helpful hint for providing the field
        hint: String,
    },

    /// Invalid value for a configuration option
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The invalid value
        value: String,
        /// Helpful hint for correct values
        hint: String,
    },

    /// The merged configuration could not be extracted
    #[error("Failed to load configuration: {0}\n\nHint: Check costcheck.json syntax and COSTCHECK_* variables")]
    Extract(#[from] Box<figment::Error>),
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Converts a CLI error into a miette report for display by `main`.
#[must_use]
pub fn cli_error_to_miette(err: CliError) -> miette::Report {
    match err {
        CliError::Browser(BrowserError::LaunchFailed { reason, .. }) => miette::miette!(
            "Failed to launch Chrome: {}\n\nHint: Install Chrome/Chromium or pass --chrome-path",
            reason
        ),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        other => miette::miette!("{}", other),
    }
}
