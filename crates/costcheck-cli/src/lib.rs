//! costcheck CLI - smoke test for the product page's Miscellaneous Costs panel.
//!
//! Launches headless Chrome against a running frontend, answers the page's
//! API calls from fixtures, opens the Pricing & Values tab and checks that
//! the expected misc cost note is rendered. A screenshot is kept as evidence.
//!
//! # Architecture
//!
//! - [`scenario`] - The verification flow and its browser seams
//! - [`fixtures`] - Route stubs standing in for the backend
//! - [`config`] - Settings merged from defaults, file, environment and flags
//! - [`error`] - Error types with actionable messages
//! - [`logger`] - Structured logging with tracing
//! - [`ui`] - Status lines on stderr
//! - `cli` / `commands` - Argument parsing and command implementations
//!
//! # Example
//!
//! ```no_run
//! use costcheck_browser::TestBrowser;
//! use costcheck_cli::{config::VerifyConfig, error::Result, logger, scenario};
//!
//! # async fn example() -> Result<()> {
//! logger::init_logger(false, false, false);
//! let config = VerifyConfig::default();
//! let browser = TestBrowser::launch(config.browser_config()).await?;
//! let outcome = scenario::run(browser, &config).await;
//! outcome.into_result(true)
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod logger;
pub mod scenario;
pub mod ui;

// Re-export commonly used types
pub use config::VerifyConfig;
pub use error::{CliError, ConfigError, Result};
pub use scenario::{BrowserSession, Outcome, ProductPage};
