//! costcheck - smoke test for the product page's Miscellaneous Costs panel.
//!
//! Parses arguments, initializes logging, and dispatches the command.

use clap::Parser;
use costcheck_cli::{cli, commands, error, logger, ui};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = cli::Cli::parse();

    // Initialize logging and colors based on global flags
    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = match args.command_or_default() {
        cli::Command::Run(run_args) => commands::run_execute(run_args).await,
        cli::Command::Routes(routes_args) => commands::routes_execute(routes_args).await,
    };

    // Convert CLI errors to miette diagnostics for error reporting
    result.map_err(error::cli_error_to_miette)
}
