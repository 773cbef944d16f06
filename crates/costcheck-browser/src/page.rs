//! Page-level operations: navigation, locators, storage, routes, screenshots.

use crate::console::{ConsoleCapture, ConsoleMessage};
use crate::error::{BrowserError, Result};
use crate::locator::{marker_selector, Locator};
use crate::route::{self, RouteTable};
use crate::server::DevServer;
use crate::wait::{wait_for_result, WaitConfig};
use chromiumoxide::cdp::browser_protocol::fetch::{EnableParams, EventRequestPaused};
use chromiumoxide::cdp::js_protocol::runtime::EventConsoleApiCalled;
use chromiumoxide::page::{Page as ChromePage, ScreenshotParams};
use futures::StreamExt;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// A browser tab.
///
/// Wraps `chromiumoxide::page::Page` with console capture, locator-based
/// waits and clicks, local storage access and route stubs. Background tasks
/// (console listener, request interception) are aborted when the page is
/// dropped.
#[derive(Debug)]
pub struct Page {
    inner: Arc<ChromePage>,
    console: ConsoleCapture,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Page {
    pub(crate) fn new(page: ChromePage) -> Self {
        let console = ConsoleCapture::new();
        let inner = Arc::new(page);

        let listener_page = inner.clone();
        let sink = console.clone();
        let console_task = tokio::spawn(async move {
            if let Ok(mut events) = listener_page
                .event_listener::<EventConsoleApiCalled>()
                .await
            {
                while let Some(event) = events.next().await {
                    sink.push(ConsoleMessage::from_event(&event));
                }
            }
        });

        Self {
            inner,
            console,
            tasks: Mutex::new(vec![console_task]),
        }
    }

    /// Console messages captured since the page was created.
    #[must_use]
    pub fn console(&self) -> &ConsoleCapture {
        &self.console
    }

    /// Intercepts every request the page issues and answers those matching a
    /// stub in `routes`; the rest continue untouched.
    ///
    /// Call this before navigating. The table is shared, so the caller's
    /// clone observes hit counts.
    ///
    /// # Errors
    ///
    /// Returns `RouteSetupFailed` if the `Fetch` domain cannot be enabled.
    pub async fn install_routes(&self, routes: RouteTable) -> Result<()> {
        // Subscribe before enabling so no paused request slips past.
        let mut paused = self
            .inner
            .event_listener::<EventRequestPaused>()
            .await
            .map_err(|e| BrowserError::RouteSetupFailed(e.to_string()))?;

        self.inner
            .execute(EnableParams::default())
            .await
            .map_err(|e| BrowserError::RouteSetupFailed(e.to_string()))?;

        debug!(stubs = routes.len(), "request interception enabled");

        let page = self.inner.clone();
        let task = tokio::spawn(async move {
            while let Some(event) = paused.next().await {
                if let Err(e) = route::answer(&page, &routes, &event).await {
                    warn!(url = %event.request.url, "failed to answer intercepted request: {e}");
                }
            }
        });

        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(task);
        Ok(())
    }

    /// Navigates to an absolute URL and waits for the document to load.
    ///
    /// # Errors
    ///
    /// Returns `NavigationFailed` if the page fails to load, or `WaitTimeout`
    /// if it never becomes ready.
    pub async fn navigate(&self, url: &str) -> Result<()> {
        debug!(url, "navigating");
        self.inner
            .goto(url)
            .await
            .map_err(|e| BrowserError::NavigationFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        self.wait_for_load(WaitConfig::default()).await
    }

    /// Navigates to a path on a dev server after checking it is healthy.
    ///
    /// # Errors
    ///
    /// Returns an error if the health check or navigation fails.
    pub async fn navigate_to(&self, server: &dyn DevServer, path: &str) -> Result<()> {
        server.health_check().await?;
        self.navigate(&server.url(path)).await
    }

    /// Waits until `document.readyState` is `complete`.
    ///
    /// # Errors
    ///
    /// Returns `WaitTimeout` if the document never finishes loading.
    pub async fn wait_for_load(&self, config: WaitConfig) -> Result<()> {
        wait_for_result(
            || async move {
                let state: String = self.evaluate("document.readyState").await?;
                Ok(state == "complete")
            },
            config,
            "document ready",
        )
        .await
    }

    /// Evaluates JavaScript in the page and deserializes the result.
    ///
    /// Never interpolate untrusted input into `script`; locator scripts
    /// JSON-encode their arguments for that reason.
    ///
    /// # Errors
    ///
    /// Returns `ScriptExecutionFailed` if evaluation throws or the result
    /// does not deserialize into `T`.
    pub async fn evaluate<T>(&self, script: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.inner
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::ScriptExecutionFailed(e.to_string()))?
            .into_value()
            .map_err(|e| BrowserError::ScriptExecutionFailed(e.to_string()))
    }

    /// Returns true if at least one element matching `locator` is visible now.
    ///
    /// # Errors
    ///
    /// Returns `ScriptExecutionFailed` if the locator script fails (for
    /// example an invalid CSS selector).
    pub async fn is_visible(&self, locator: &Locator) -> Result<bool> {
        self.evaluate(&locator.visible_script()).await
    }

    /// Number of elements currently matching `locator`, visible or not.
    ///
    /// # Errors
    ///
    /// Returns `ScriptExecutionFailed` if the locator script fails.
    pub async fn count(&self, locator: &Locator) -> Result<usize> {
        self.evaluate(&locator.count_script()).await
    }

    /// Waits for a visible element matching a selector string.
    ///
    /// Accepts CSS selectors and `text=...` selectors.
    ///
    /// # Errors
    ///
    /// Returns `WaitTimeout` if no visible match appears in time.
    pub async fn wait_for_selector(&self, selector: &str, config: WaitConfig) -> Result<()> {
        let locator = Locator::parse(selector);
        wait_for_result(
            || self.is_visible(&locator),
            config,
            &locator.to_string(),
        )
        .await
    }

    /// Asserts that `locator` becomes visible within `config.timeout`.
    ///
    /// # Errors
    ///
    /// Returns `AssertionFailed` if it does not.
    pub async fn expect_visible(&self, locator: &Locator, config: WaitConfig) -> Result<()> {
        wait_for_result(|| self.is_visible(locator), config, &locator.to_string())
            .await
            .map_err(|e| match e {
                BrowserError::WaitTimeout { timeout, .. } => BrowserError::AssertionFailed {
                    locator: locator.to_string(),
                    expected: "visible".to_string(),
                    timeout,
                },
                other => other,
            })
    }

    /// Clicks the first visible element matching `locator`, retrying until
    /// `config.timeout`.
    ///
    /// The element is tagged with a one-off marker attribute so that
    /// chromiumoxide can resolve it by CSS, scroll it into view and dispatch
    /// a real mouse click at its center. If the page re-renders between
    /// tagging and clicking, the attempt is repeated with a fresh marker.
    ///
    /// Matching is not strict: with several visible matches the first one in
    /// document order is clicked.
    ///
    /// # Errors
    ///
    /// Returns `ElementNotFound` if nothing visible could be clicked in time.
    pub async fn click(&self, locator: &Locator, config: WaitConfig) -> Result<()> {
        wait_for_result(|| self.try_click(locator), config, &locator.to_string())
            .await
            .map_err(|e| match e {
                BrowserError::WaitTimeout { .. } => BrowserError::ElementNotFound {
                    locator: locator.to_string(),
                },
                other => other,
            })
    }

    /// One tag-and-click attempt. `Ok(false)` when nothing visible matches.
    async fn try_click(&self, locator: &Locator) -> Result<bool> {
        let marker = uuid::Uuid::new_v4().to_string();
        let tagged: bool = self.evaluate(&locator.mark_script(&marker)).await?;
        if !tagged {
            return Ok(false);
        }

        debug!(%locator, "clicking");
        let element = self.inner.find_element(marker_selector(&marker)).await?;
        element.click().await?;
        Ok(true)
    }

    /// Writes `value` under `key` in the page origin's `localStorage`.
    ///
    /// # Errors
    ///
    /// Returns `ScriptExecutionFailed` if storage is unavailable (for
    /// example on `about:blank`).
    pub async fn set_local_storage(&self, key: &str, value: &str) -> Result<()> {
        let script = format!(
            "(() => {{ localStorage.setItem({}, {}); return true; }})()",
            serde_json::Value::String(key.to_string()),
            serde_json::Value::String(value.to_string())
        );
        self.evaluate::<bool>(&script).await?;
        Ok(())
    }

    /// Reads `key` from the page origin's `localStorage`.
    ///
    /// # Errors
    ///
    /// Returns `ScriptExecutionFailed` if storage is unavailable.
    pub async fn local_storage(&self, key: &str) -> Result<Option<String>> {
        // Wrapped in an array: a bare `null` result carries no value over CDP.
        let script = format!(
            "[localStorage.getItem({})]",
            serde_json::Value::String(key.to_string())
        );
        let [value]: [Option<String>; 1] = self.evaluate(&script).await?;
        Ok(value)
    }

    /// Returns the current page URL.
    ///
    /// # Errors
    ///
    /// Returns an error if script execution fails.
    pub async fn url(&self) -> Result<String> {
        self.evaluate("window.location.href").await
    }

    /// Returns the page title.
    ///
    /// # Errors
    ///
    /// Returns an error if script execution fails.
    pub async fn title(&self) -> Result<String> {
        self.evaluate("document.title").await
    }

    /// Captures the viewport as PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the capture fails.
    pub async fn screenshot(&self) -> Result<Vec<u8>> {
        self.inner
            .screenshot(ScreenshotParams::default())
            .await
            .map_err(|e| BrowserError::ScriptExecutionFailed(e.to_string()))
    }

    /// Captures the viewport and writes it to `path`, creating parent
    /// directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the capture or the write fails.
    pub async fn screenshot_to(&self, path: &Path) -> Result<()> {
        let png = self.screenshot().await?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, png).await?;
        debug!(path = %path.display(), "screenshot written");
        Ok(())
    }

    /// Closes the tab.
    ///
    /// # Errors
    ///
    /// Returns an error if the close command fails.
    pub async fn close(self) -> Result<()> {
        self.abort_tasks();
        self.inner.as_ref().clone().close().await?;
        Ok(())
    }

    fn abort_tasks(&self) {
        for task in self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
        {
            task.abort();
        }
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        self.abort_tasks();
    }
}
