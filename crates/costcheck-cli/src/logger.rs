//! Logging setup for the costcheck CLI.
//!
//! Progress of the verification flow goes through [`crate::ui`]; tracing
//! carries the detail underneath it (intercepted requests, navigation,
//! screenshot paths).
//!
//! The level is chosen in this order:
//! 1. `--verbose`: DEBUG for the costcheck crates
//! 2. `--quiet`: ERROR only
//! 3. `RUST_LOG`
//! 4. Default: INFO for the costcheck crates

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used by `--verbose`.
pub const VERBOSE_FILTER: &str = "costcheck_cli=debug,costcheck_browser=debug";

/// Filter used by `--quiet`.
pub const QUIET_FILTER: &str = "costcheck_cli=error,costcheck_browser=error";

/// Filter used when neither flag nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "costcheck_cli=info,costcheck_browser=info";

/// Picks the filter directives for the given flags.
#[must_use]
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Initialize the global tracing subscriber. Call once, early in `main`.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

/// Initialize the global subscriber with an explicit filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
