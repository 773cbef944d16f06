//! Command implementations for the costcheck CLI.
//!
//! - [`run`] - Launch Chrome and verify the Miscellaneous Costs panel
//! - [`routes`] - Print the stubbed API routes
//!
//! Each command provides an `execute` function that takes the parsed
//! command arguments and returns a Result.

pub mod routes;
pub mod run;

// Re-export execute functions for convenience
pub use routes::execute as routes_execute;
pub use run::execute as run_execute;
