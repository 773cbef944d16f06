//! Configuration for a verification run.
//!
//! Merges settings from CLI args, environment variables, and config files.
//! Priority: CLI > Environment (`COSTCHECK_*`) > File (`costcheck.json`) > Defaults

mod defaults;
mod loading;
mod validation;

use costcheck_browser::{StaticUrlServer, TestBrowserConfig, WaitConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub use defaults::*;
pub use loading::{ConfigOverrides, DEFAULT_CONFIG_FILE, ENV_PREFIX};
pub use validation::validate_base_url;

/// Screenshot written when the tab never shows up.
pub const TIMEOUT_SCREENSHOT: &str = "timeout.png";

/// Screenshot written after a successful run.
pub const VERIFICATION_SCREENSHOT: &str = "verification.png";

/// Everything a run needs to know about the frontend and the expectations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyConfig {
    /// Where the frontend dev server listens
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Product whose page is opened and whose fixtures are served
    #[serde(default = "default_product_id")]
    pub product_id: u64,

    /// localStorage key the frontend reads its auth token from
    #[serde(default = "default_token_key")]
    pub token_key: String,

    /// Token value injected before opening the product page
    #[serde(default = "default_auth_token")]
    pub auth_token: String,

    /// Directory receiving screenshots
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// Label of the tab to open
    #[serde(default = "default_tab_text")]
    pub tab_text: String,

    /// Heading that must become visible once the tab is open
    #[serde(default = "default_section_text")]
    pub section_text: String,

    /// Note of the misc cost whose input must be visible
    #[serde(default = "default_expected_note")]
    pub expected_note: String,

    /// How long to wait for the tab label after navigation
    #[serde(default = "default_tab_timeout_ms")]
    pub tab_timeout_ms: u64,

    /// How long each visibility expectation is retried
    #[serde(default = "default_expect_timeout_ms")]
    pub expect_timeout_ms: u64,

    /// Run Chrome without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Viewport width in pixels
    #[serde(default = "default_window_width")]
    pub window_width: u32,

    /// Viewport height in pixels
    #[serde(default = "default_window_height")]
    pub window_height: u32,

    /// Chrome executable; auto-detected when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<PathBuf>,

    /// Exit non-zero when the run fails instead of only reporting it
    #[serde(default)]
    pub fail_on_error: bool,
}

impl VerifyConfig {
    /// Path of the product page, relative to `base_url`.
    #[must_use]
    pub fn product_path(&self) -> String {
        format!("/inventory/product/{}", self.product_id)
    }

    /// Where the tab-timeout screenshot goes.
    #[must_use]
    pub fn timeout_screenshot(&self) -> PathBuf {
        self.out_dir.join(TIMEOUT_SCREENSHOT)
    }

    /// Where the success screenshot goes.
    #[must_use]
    pub fn verification_screenshot(&self) -> PathBuf {
        self.out_dir.join(VERIFICATION_SCREENSHOT)
    }

    /// Wait used for the tab label.
    #[must_use]
    pub fn tab_wait(&self) -> WaitConfig {
        WaitConfig::with_timeout(Duration::from_millis(self.tab_timeout_ms))
    }

    /// Wait used for visibility expectations.
    #[must_use]
    pub fn expect_wait(&self) -> WaitConfig {
        WaitConfig::with_timeout(Duration::from_millis(self.expect_timeout_ms))
    }

    /// The frontend under test.
    #[must_use]
    pub fn server(&self) -> StaticUrlServer {
        StaticUrlServer::new(self.base_url.clone())
    }

    /// Browser launch settings.
    #[must_use]
    pub fn browser_config(&self) -> TestBrowserConfig {
        let config = TestBrowserConfig::new()
            .with_headless(self.headless)
            .with_window_size(self.window_width, self.window_height);
        match &self.chrome_path {
            Some(path) => config.with_chrome_path(path),
            None => config,
        }
    }

    /// Example costcheck.json content, equal to the defaults.
    #[must_use]
    pub fn example_config() -> String {
        serde_json::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("{}"))
    }
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            product_id: default_product_id(),
            token_key: default_token_key(),
            auth_token: default_auth_token(),
            out_dir: default_out_dir(),
            tab_text: default_tab_text(),
            section_text: default_section_text(),
            expected_note: default_expected_note(),
            tab_timeout_ms: default_tab_timeout_ms(),
            expect_timeout_ms: default_expect_timeout_ms(),
            headless: default_headless(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            chrome_path: None,
            fail_on_error: false,
        }
    }
}
