use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::config::ConfigOverrides;

/// Available costcheck subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the verification against a running frontend
    ///
    /// Stubs the backend, opens the product page, clicks the Pricing & Values
    /// tab and checks the Miscellaneous Costs panel. Writes verification.png,
    /// or timeout.png when the tab never shows up.
    Run(RunArgs),

    /// Print the stubbed API routes and their fixture bodies
    Routes(RoutesArgs),
}

/// Arguments for the run command
///
/// Every flag overrides the matching config field.
#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct RunArgs {
    /// Path to a config file (default: ./costcheck.json when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base URL of the frontend
    ///
    /// Examples:
    ///   --base-url http://localhost:5173
    ///   --base-url https://staging.example.com
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Product whose page is opened and whose fixtures are served
    #[arg(long, value_name = "ID")]
    pub product_id: Option<u64>,

    /// Directory receiving screenshots
    #[arg(short = 'o', long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Chrome executable to launch instead of the auto-detected one
    #[arg(long, value_name = "PATH")]
    pub chrome_path: Option<PathBuf>,

    /// Exit non-zero when the verification fails
    #[arg(long)]
    pub fail_on_error: bool,
}

impl RunArgs {
    /// The config overrides these flags stand for. Boolean flags only
    /// override when present.
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: self.base_url.clone(),
            product_id: self.product_id,
            out_dir: self.out_dir.clone(),
            headless: self.headed.then_some(false),
            chrome_path: self.chrome_path.clone(),
            fail_on_error: self.fail_on_error.then_some(true),
        }
    }
}

/// Arguments for the routes command
#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct RoutesArgs {
    /// Product id spliced into the routes (default: from config)
    #[arg(long, value_name = "ID")]
    pub product_id: Option<u64>,

    /// Path to a config file (default: ./costcheck.json when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the table as JSON
    #[arg(long)]
    pub json: bool,
}
