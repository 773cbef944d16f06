//! Command-line interface definition for costcheck.
//!
//! Built with clap v4's derive macros.
//!
//! # Command Structure
//!
//! - `costcheck run` - Verify the Miscellaneous Costs panel (the default)
//! - `costcheck routes` - Print the stubbed API routes

mod commands;

use clap::Parser;

pub use commands::{Command, RoutesArgs, RunArgs};

/// costcheck - smoke test for the product page's Miscellaneous Costs panel
#[derive(Parser, Debug)]
#[command(
    name = "costcheck",
    version,
    about = "Smoke test for the product page's Miscellaneous Costs panel",
    long_about = "costcheck opens the product page of a running frontend in headless Chrome,\n\
                  answers its API calls with fixtures, opens the Pricing & Values tab and\n\
                  checks that the Miscellaneous Costs panel shows the expected note.\n\
                  A screenshot is written as evidence."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    ///
    /// Shows intercepted requests, navigation and screenshot paths.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The subcommand to dispatch, with `run` filled in when none was given.
    #[must_use]
    pub fn command_or_default(self) -> Command {
        self.command.unwrap_or_else(|| Command::Run(RunArgs::default()))
    }
}
