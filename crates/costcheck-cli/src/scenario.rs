//! The "Miscellaneous Costs" verification flow.
//!
//! The flow talks to the browser through two small traits so that its error
//! paths can be exercised without Chrome:
//!
//! - [`ProductPage`]: the handful of page operations the flow needs
//! - [`BrowserSession`]: opens that page and is closed exactly once
//!
//! Both are implemented for the `costcheck-browser` types.

use async_trait::async_trait;
use costcheck_browser::{
    ConsoleMessage, DevServer, Locator, Page, RouteTable, TestBrowser, WaitConfig,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::VerifyConfig;
use crate::error::{CliError, Result};
use crate::fixtures;
use crate::ui;

/// Page operations used by [`verify_misc_costs`].
#[async_trait]
pub trait ProductPage: Send + Sync {
    /// Installs the route stubs. Must run before the first navigation.
    async fn install_routes(&self, routes: RouteTable) -> costcheck_browser::Result<()>;

    /// Navigates to an absolute URL and waits for the load to finish.
    async fn goto(&self, url: &str) -> costcheck_browser::Result<()>;

    /// Writes a localStorage entry for the current origin.
    async fn set_local_storage(&self, key: &str, value: &str) -> costcheck_browser::Result<()>;

    /// Waits for visible text. Fails with `WaitTimeout`.
    async fn wait_for_text(&self, text: &str, wait: WaitConfig) -> costcheck_browser::Result<()>;

    /// Clicks the first visible element with this text, retrying until
    /// `wait` expires.
    async fn click_text(&self, text: &str, wait: WaitConfig) -> costcheck_browser::Result<()>;

    /// Asserts visibility. Fails with `AssertionFailed`.
    async fn expect_visible(
        &self,
        locator: &Locator,
        wait: WaitConfig,
    ) -> costcheck_browser::Result<()>;

    /// Writes a PNG screenshot, creating parent directories.
    async fn screenshot_to(&self, path: &Path) -> costcheck_browser::Result<()>;

    /// Console errors logged by the page so far.
    fn console_errors(&self) -> Vec<ConsoleMessage> {
        Vec::new()
    }
}

/// A running browser the flow can open its page in.
#[async_trait]
pub trait BrowserSession: Send + Sync + Sized {
    /// Page type handed out by [`BrowserSession::open_page`].
    type Page: ProductPage;

    /// Opens the single page used by the flow.
    async fn open_page(&self) -> costcheck_browser::Result<Self::Page>;

    /// Shuts the browser down.
    async fn close(self) -> costcheck_browser::Result<()>;
}

#[async_trait]
impl ProductPage for Page {
    async fn install_routes(&self, routes: RouteTable) -> costcheck_browser::Result<()> {
        Page::install_routes(self, routes).await
    }

    async fn goto(&self, url: &str) -> costcheck_browser::Result<()> {
        self.navigate(url).await
    }

    async fn set_local_storage(&self, key: &str, value: &str) -> costcheck_browser::Result<()> {
        Page::set_local_storage(self, key, value).await
    }

    async fn wait_for_text(&self, text: &str, wait: WaitConfig) -> costcheck_browser::Result<()> {
        self.wait_for_selector(&Locator::text(text).to_string(), wait).await
    }

    async fn click_text(&self, text: &str, wait: WaitConfig) -> costcheck_browser::Result<()> {
        self.click(&Locator::text(text), wait).await
    }

    async fn expect_visible(
        &self,
        locator: &Locator,
        wait: WaitConfig,
    ) -> costcheck_browser::Result<()> {
        Page::expect_visible(self, locator, wait).await
    }

    async fn screenshot_to(&self, path: &Path) -> costcheck_browser::Result<()> {
        Page::screenshot_to(self, path).await
    }

    fn console_errors(&self) -> Vec<ConsoleMessage> {
        self.console().errors()
    }
}

#[async_trait]
impl BrowserSession for TestBrowser {
    type Page = Page;

    async fn open_page(&self) -> costcheck_browser::Result<Page> {
        self.new_page().await
    }

    async fn close(self) -> costcheck_browser::Result<()> {
        TestBrowser::close(self).await
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum Outcome {
    /// Every expectation held; the evidence screenshot was written.
    Verified {
        /// Path of `verification.png`
        screenshot: PathBuf,
    },
    /// The flow stopped early. The error has already been reported.
    Failed {
        /// What went wrong
        error: CliError,
    },
}

impl Outcome {
    /// Whether the run verified the panel.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        matches!(self, Outcome::Verified { .. })
    }

    /// Turns the outcome into the command's result.
    ///
    /// A failure only becomes an error when `fail_on_error` is set;
    /// otherwise it has been reported and is swallowed.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Verification` for a failed run with `fail_on_error`.
    pub fn into_result(self, fail_on_error: bool) -> Result<()> {
        match self {
            Outcome::Failed { error } if fail_on_error => {
                Err(CliError::Verification(error.to_string()))
            }
            _ => Ok(()),
        }
    }
}

/// Input that must be rendered for the expected misc cost note.
#[must_use]
pub fn note_input(note: &str) -> Locator {
    let escaped = note.replace('\\', "\\\\").replace('\'', "\\'");
    Locator::css(format!("input[value='{escaped}']"))
}

/// Runs the flow on an open page and returns the screenshot path.
///
/// # Errors
///
/// Returns the first failing step. When the tab label never appears a
/// `timeout.png` screenshot is written before the timeout error is returned.
pub async fn verify_misc_costs<P: ProductPage + ?Sized>(
    page: &P,
    config: &VerifyConfig,
) -> Result<PathBuf> {
    let server = config.server();

    ui::step("Setting up mocks...");
    let routes = fixtures::route_table(config.product_id)?;
    debug!(stubs = routes.len(), "installing route stubs");
    page.install_routes(routes).await?;

    ui::step("Navigating to page...");
    page.goto(&server.url("/")).await?;
    page.set_local_storage(&config.token_key, &config.auth_token).await?;
    page.goto(&server.url(&config.product_path())).await?;

    ui::step("Waiting for page load...");
    if let Err(e) = page.wait_for_text(&config.tab_text, config.tab_wait()).await {
        ui::warning("Timeout waiting for Pricing tab. Taking screenshot.");
        let shot = config.timeout_screenshot();
        match page.screenshot_to(&shot).await {
            Ok(()) => info!(path = %shot.display(), "timeout screenshot written"),
            Err(shot_err) => warn!(error = %shot_err, "could not write timeout screenshot"),
        }
        return Err(e.into());
    }

    ui::step("Clicking Pricing tab...");
    page.click_text(&config.tab_text, config.expect_wait()).await?;

    ui::step("Checking for Miscellaneous Costs...");
    let section = Locator::text(&config.section_text);
    page.expect_visible(&section, config.expect_wait()).await?;
    let note = note_input(&config.expected_note);
    page.expect_visible(&note, config.expect_wait()).await?;

    ui::step("Taking verification screenshot...");
    let shot = config.verification_screenshot();
    page.screenshot_to(&shot).await?;
    info!(path = %shot.display(), "verification screenshot written");

    ui::success("Done.");
    Ok(shot)
}

/// Opens the page, runs the flow and closes the session.
///
/// The session is closed exactly once whatever happens. Failures are
/// printed as `Error: {e}` and returned in the [`Outcome`] instead of being
/// propagated.
pub async fn run<S: BrowserSession>(session: S, config: &VerifyConfig) -> Outcome {
    let result = match session.open_page().await {
        Ok(page) => {
            let result = verify_misc_costs(&page, config).await;
            report_console_errors(&page.console_errors());
            result
        }
        Err(e) => Err(e.into()),
    };

    if let Err(e) = session.close().await {
        warn!(error = %e, "browser did not close cleanly");
    }

    match result {
        Ok(screenshot) => Outcome::Verified { screenshot },
        Err(error) => {
            ui::error(&format!("Error: {error}"));
            Outcome::Failed { error }
        }
    }
}

fn report_console_errors(errors: &[ConsoleMessage]) {
    for message in errors {
        warn!(text = %message.text, "page console error");
    }
}
