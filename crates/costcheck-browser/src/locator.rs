//! Element locators and the page scripts that resolve them.
//!
//! A [`Locator`] is either a CSS selector or a text match. Text matching is
//! case-insensitive, collapses whitespace, and only considers the innermost
//! elements containing the text, so `text=Pricing & Values` resolves to the
//! tab label rather than to every ancestor up to `<body>`.
//!
//! All user-supplied strings are embedded as JSON string literals, never
//! spliced into the script source directly.

use std::fmt;

/// Attribute used to tag a resolved element so it can be re-found with CSS.
pub const MARKER_ATTRIBUTE: &str = "data-costcheck-target";

/// Prefix that turns a selector string into a text locator.
const TEXT_PREFIX: &str = "text=";

/// Shared helpers injected in front of every locator script.
const PRELUDE: &str = r"
const norm = (s) => (s || '').replace(/\s+/g, ' ').trim().toLowerCase();
const isVisible = (el) => {
  const rect = el.getBoundingClientRect();
  const style = window.getComputedStyle(el);
  return rect.width > 0 && rect.height > 0 && style.visibility !== 'hidden';
};
const SKIP = new Set(['SCRIPT', 'STYLE', 'NOSCRIPT', 'TEMPLATE', 'HEAD']);
";

/// How to find elements on a page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// A CSS selector, passed to `querySelectorAll`.
    Css(String),
    /// A text fragment, matched against element text content.
    Text(String),
}

impl Locator {
    /// Creates a CSS locator.
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    /// Creates a text locator.
    pub fn text(text: impl Into<String>) -> Self {
        Locator::Text(text.into())
    }

    /// Parses a selector string. `text=...` yields a text locator, anything
    /// else is treated as CSS.
    #[must_use]
    pub fn parse(selector: &str) -> Self {
        match selector.strip_prefix(TEXT_PREFIX) {
            Some(text) => Locator::text(text),
            None => Locator::css(selector),
        }
    }

    /// Script evaluating to the number of matching elements.
    #[must_use]
    pub fn count_script(&self) -> String {
        self.wrap("return found.length;")
    }

    /// Script evaluating to true when at least one match is visible.
    #[must_use]
    pub fn visible_script(&self) -> String {
        self.wrap("return found.some(isVisible);")
    }

    /// Script that tags the first visible match with [`MARKER_ATTRIBUTE`]
    /// set to `marker`, evaluating to true if an element was tagged.
    #[must_use]
    pub fn mark_script(&self, marker: &str) -> String {
        let attribute = js_string(MARKER_ATTRIBUTE);
        let marker = js_string(marker);
        self.wrap(&format!(
            "const el = found.find(isVisible);\n\
             if (!el) return false;\n\
             el.setAttribute({attribute}, {marker});\n\
             return true;"
        ))
    }

    /// Expression producing `found`, the array of matching elements.
    fn finder(&self) -> String {
        match self {
            Locator::Css(selector) => format!(
                "const found = Array.from(document.querySelectorAll({}));",
                js_string(selector)
            ),
            Locator::Text(text) => format!(
                "const needle = {};\n\
                 const matches = (el) => !SKIP.has(el.tagName) && norm(el.textContent).includes(needle);\n\
                 const found = Array.from(document.querySelectorAll('body *'))\
                 .filter((el) => matches(el) && !Array.from(el.children).some(matches));",
                js_string(&normalize_text(text))
            ),
        }
    }

    fn wrap(&self, body: &str) -> String {
        format!("(() => {{{PRELUDE}{}\n{body}\n}})()", self.finder())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(selector) => f.write_str(selector),
            Locator::Text(text) => write!(f, "{TEXT_PREFIX}{text}"),
        }
    }
}

impl From<&str> for Locator {
    fn from(selector: &str) -> Self {
        Locator::parse(selector)
    }
}

/// CSS selector for an element tagged by [`Locator::mark_script`].
#[must_use]
pub fn marker_selector(marker: &str) -> String {
    format!("[{MARKER_ATTRIBUTE}={}]", js_string(marker))
}

/// Lowercases and collapses whitespace the same way the page-side `norm` does.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Encodes a string as a JSON (and therefore JavaScript) string literal.
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_distinguishes_text_and_css() {
        assert_eq!(
            Locator::parse("text=Pricing & Values"),
            Locator::Text("Pricing & Values".into())
        );
        assert_eq!(
            Locator::parse("input[value='Handling']"),
            Locator::Css("input[value='Handling']".into())
        );
        assert_eq!(Locator::from("#heading"), Locator::css("#heading"));
    }

    #[test]
    fn display_round_trips_the_selector_string() {
        assert_eq!(
            Locator::text("Miscellaneous Costs").to_string(),
            "text=Miscellaneous Costs"
        );
        assert_eq!(Locator::css("div > input").to_string(), "div > input");
    }

    #[test]
    fn text_is_normalized_before_embedding() {
        assert_eq!(normalize_text("  Pricing \n&   Values "), "pricing & values");

        let script = Locator::text("Pricing  &  VALUES").visible_script();
        assert!(script.contains(r#"const needle = "pricing & values";"#));
    }

    #[test]
    fn css_selector_is_json_escaped() {
        let script = Locator::css("input[value='Handling']").count_script();
        assert!(script.contains(r#"document.querySelectorAll("input[value='Handling']")"#));
        assert!(script.trim_end().ends_with("})()"));
    }

    #[test]
    fn injection_attempts_stay_inside_string_literals() {
        let hostile = r#"");alert("x"); //"#;
        let script = Locator::text(hostile).count_script();
        assert!(script.contains(r#""\");alert(\"x\"); //""#));
        assert!(!script.contains(r#"");alert("x");"#));
    }

    #[test]
    fn mark_script_sets_marker_attribute() {
        let script = Locator::text("Pricing & Values").mark_script("abc-123");
        assert!(script.contains(r#"el.setAttribute("data-costcheck-target", "abc-123");"#));
        assert_eq!(
            marker_selector("abc-123"),
            r#"[data-costcheck-target="abc-123"]"#
        );
    }

    #[test]
    fn mark_script_picks_first_visible_match() {
        let script = Locator::css("button").mark_script("m");
        assert!(script.contains("const el = found.find(isVisible);"));
        assert!(script.contains("if (!el) return false;"));
    }
}
