//! Routes command implementation.
//!
//! Prints the stub table the run command installs, so the fixtures can be
//! checked against the backend without starting a browser.

use std::fmt::Write as _;

use crate::cli::RoutesArgs;
use crate::config::{ConfigOverrides, VerifyConfig};
use crate::error::Result;
use crate::fixtures::{self, RouteRow};

/// Execute the routes command.
///
/// # Errors
///
/// Returns configuration errors, or a JSON error if the table cannot be
/// serialized.
pub async fn execute(args: RoutesArgs) -> Result<()> {
    let overrides = ConfigOverrides {
        product_id: args.product_id,
        ..ConfigOverrides::default()
    };
    let config = VerifyConfig::load(args.config.as_deref(), &overrides)?;
    let rows = fixtures::describe(config.product_id);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", render_table(&rows)?);
    }
    Ok(())
}

/// Formats rows as `STATUS  PATTERN  BODY` lines with aligned columns.
///
/// # Errors
///
/// Returns a JSON error if a body cannot be serialized.
pub fn render_table(rows: &[RouteRow]) -> Result<String> {
    let width = rows
        .iter()
        .map(|row| row.pattern.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for row in rows {
        let body = serde_json::to_string(&row.body)?;
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{}  {:<width$}  {}", row.status, row.pattern, body);
    }
    Ok(out)
}
