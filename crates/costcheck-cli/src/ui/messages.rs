//! Status lines of the verification flow, printed to stdout.
//!
//! Without colors a line is exactly the message, so output captured from a
//! pipe reads `Setting up mocks...`, `Done.` and so on.

use owo_colors::OwoColorize;
use std::sync::atomic::{AtomicBool, Ordering};

static COLORS: AtomicBool = AtomicBool::new(false);

pub(crate) fn set_colors(enabled: bool) {
    COLORS.store(enabled, Ordering::Relaxed);
}

/// The line printed for `message`, decorated when colors are on.
fn render(message: &str, styled: impl FnOnce() -> String) -> String {
    if COLORS.load(Ordering::Relaxed) {
        styled()
    } else {
        message.to_string()
    }
}

/// Print a progress step of the verification flow.
///
/// # Examples
///
/// ```no_run
/// use costcheck_cli::ui::step;
///
/// step("Setting up mocks...");
/// ```
pub fn step(message: &str) {
    println!("{}", render(message, || format!("{} {}", "→".cyan().bold(), message)));
}

/// Print a success message.
pub fn success(message: &str) {
    println!("{}", render(message, || format!("{} {}", "✓".green().bold(), message)));
}

/// Print a warning message.
pub fn warning(message: &str) {
    println!("{}", render(message, || format!("{} {}", "⚠".yellow().bold(), message.yellow())));
}

/// Print an error message.
///
/// # Examples
///
/// ```no_run
/// use costcheck_cli::ui::error;
///
/// error("Error: wait condition 'text=Pricing & Values' timed out after 15s");
/// ```
pub fn error(message: &str) {
    println!("{}", render(message, || format!("{} {}", "✗".red().bold(), message.red())));
}
