//! Error types for browser automation.
//!
//! Launch and connection failures, navigation errors, wait timeouts,
//! locator lookups and visibility assertions each get their own variant so
//! callers can react to a specific failure (the verification flow, for
//! example, takes a diagnostic screenshot only on a wait timeout).

use std::time::Duration;
use thiserror::Error;

/// The main error type for all browser operations.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Failed to launch the browser process.
    ///
    /// This typically occurs when Chrome/Chromium is not installed,
    /// or when there are permission issues with the executable.
    #[error("failed to launch browser: {reason}")]
    LaunchFailed {
        /// Human-readable reason for the launch failure
        reason: String,
        /// Optional underlying error that caused the failure
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to establish or use the Chrome DevTools Protocol connection.
    #[error("CDP connection failed: {0}")]
    ConnectionFailed(String),

    /// Navigation to a URL failed.
    #[error("navigation to '{url}' failed: {reason}")]
    NavigationFailed {
        /// The URL that failed to load
        url: String,
        /// Reason for the navigation failure
        reason: String,
    },

    /// A wait condition was not satisfied within the timeout.
    #[error("wait condition '{condition}' timed out after {timeout:?}")]
    WaitTimeout {
        /// Description of the condition that timed out
        condition: String,
        /// How long we waited before timing out
        timeout: Duration,
    },

    /// JavaScript execution in the page context failed.
    #[error("JavaScript execution failed: {0}")]
    ScriptExecutionFailed(String),

    /// No visible element matched a locator when one was required.
    #[error("no visible element matches {locator}")]
    ElementNotFound {
        /// The locator as written (e.g. `text=Pricing & Values`)
        locator: String,
    },

    /// An expectation about an element did not hold within its timeout.
    #[error("expected {locator} to be {expected} within {timeout:?}")]
    AssertionFailed {
        /// The locator the expectation was about
        locator: String,
        /// The expected state, e.g. "visible"
        expected: String,
        /// How long the expectation was retried
        timeout: Duration,
    },

    /// Enabling request interception or answering a paused request failed.
    #[error("route setup failed: {0}")]
    RouteSetupFailed(String),

    /// An operation was attempted on a closed browser instance.
    #[error("browser instance is already closed")]
    AlreadyClosed,

    /// Wraps errors from the chromiumoxide library.
    #[error("chromiumoxide error: {0}")]
    ChromiumOxide(#[from] chromiumoxide::error::CdpError),

    /// Generic I/O errors (screenshot writes, temp dirs).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BrowserError {
    /// Returns true if this error is a wait timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, BrowserError::WaitTimeout { .. })
    }
}

/// A specialized Result type for browser operations.
pub type Result<T> = std::result::Result<T, BrowserError>;
