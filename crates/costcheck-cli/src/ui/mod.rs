//! Terminal output: status lines and color detection.
//!
//! # Examples
//!
//! ```no_run
//! use costcheck_cli::ui;
//!
//! ui::init_colors(false);
//! ui::step("Navigating to page...");
//! ui::success("Done.");
//! ```

mod messages;

pub use messages::{error, step, success, warning};

/// Check if color output should be enabled.
///
/// `NO_COLOR` wins over `FORCE_COLOR`; otherwise colors follow whether
/// stdout is attended by a terminal.
pub fn should_use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    console::user_attended()
}

/// Initialize color support for status lines.
///
/// Colors are switched off globally when `no_color` is set or the
/// environment asks for it.
pub fn init_colors(no_color: bool) {
    let enabled = !no_color && should_use_color();
    console::set_colors_enabled(enabled);
    messages::set_colors(enabled);
}
