//! Browser lifecycle management.
//!
//! [`TestBrowser`] launches Chrome, drives the CDP handler on a background
//! task and hands out [`Page`]s. `close` consumes the browser, so a closed
//! browser cannot be closed (or used) again.

use crate::error::{BrowserError, Result};
use crate::page::Page;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Configuration for launching a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestBrowserConfig {
    /// Run without a window (default: true, unless the `visible` feature is on).
    pub headless: bool,

    /// Browser window size (default: 1920x1080).
    pub window_size: (u32, u32),

    /// Additional Chrome arguments.
    pub args: Vec<String>,

    /// Chrome executable path (None = auto-detect).
    pub chrome_path: Option<PathBuf>,
}

impl TestBrowserConfig {
    /// Creates a config with defaults for headless runs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows the browser window.
    #[must_use]
    pub fn visible(mut self) -> Self {
        self.headless = false;
        self
    }

    /// Sets headless mode explicitly.
    #[must_use]
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Sets a custom window size.
    #[must_use]
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    /// Adds additional Chrome arguments.
    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args.extend(args);
        self
    }

    /// Uses a specific Chrome executable.
    #[must_use]
    pub fn with_chrome_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_path = Some(path.into());
        self
    }

    /// The Chrome command-line arguments this config launches with, apart
    /// from the per-launch user data directory.
    #[must_use]
    pub fn chrome_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.args.len() + 2);
        if self.headless {
            args.push("--headless".to_string());
        }
        args.push(format!(
            "--window-size={},{}",
            self.window_size.0, self.window_size.1
        ));
        args.extend(self.args.iter().cloned());
        args
    }

    fn to_browser_config(&self) -> Result<BrowserConfig> {
        let mut config = BrowserConfig::builder()
            .with_head()
            .window_size(self.window_size.0, self.window_size.1);

        for arg in self.chrome_args() {
            config = config.arg(arg);
        }

        // A fresh profile per launch keeps parallel runs from tripping over
        // Chrome's ProcessSingleton lock.
        let user_data_dir =
            std::env::temp_dir().join(format!("costcheck-{}", uuid::Uuid::new_v4()));
        config = config.user_data_dir(user_data_dir);

        if let Some(path) = &self.chrome_path {
            config = config.chrome_executable(path);
        }

        config.build().map_err(|e| BrowserError::LaunchFailed {
            reason: format!("invalid browser configuration: {e}"),
            source: None,
        })
    }
}

impl Default for TestBrowserConfig {
    fn default() -> Self {
        Self {
            headless: !cfg!(feature = "visible"),
            window_size: (1920, 1080),
            args: vec![
                // Needed where user namespaces are unavailable (containers, CI).
                // Only ever point this at trusted local frontends.
                "--no-sandbox".to_string(),
                // Prevents /dev/shm exhaustion in containerized environments
                "--disable-dev-shm-usage".to_string(),
            ],
            chrome_path: None,
        }
    }
}

/// A managed browser process.
///
/// Prefer calling [`close`](Self::close) explicitly. If the browser is
/// dropped while still open, chromiumoxide kills the process on drop and a
/// warning is logged.
pub struct TestBrowser {
    inner: Mutex<Option<Browser>>,
    handler: JoinHandle<()>,
}

impl TestBrowser {
    /// Launches a browser with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `LaunchFailed` if Chrome is not installed, not executable,
    /// or fails to start.
    pub async fn launch(config: TestBrowserConfig) -> Result<Self> {
        debug!(?config, "launching browser");

        let browser_config = config.to_browser_config()?;

        let (browser, mut handler) =
            Browser::launch(browser_config)
                .await
                .map_err(|e| BrowserError::LaunchFailed {
                    reason: "failed to launch Chrome process".to_string(),
                    source: Some(Box::new(e)),
                })?;

        // chromiumoxide only makes progress while its handler is polled.
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!("browser handler error: {e}");
                }
            }
        });

        debug!("browser launched");

        Ok(Self {
            inner: Mutex::new(Some(browser)),
            handler,
        })
    }

    /// Opens a new blank page.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyClosed` if the browser has been closed, or
    /// `ConnectionFailed` if the target cannot be created.
    pub async fn new_page(&self) -> Result<Page> {
        let browser = self.inner.lock().await;
        let browser = browser.as_ref().ok_or(BrowserError::AlreadyClosed)?;

        let chrome_page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::ConnectionFailed(e.to_string()))?;

        Ok(Page::new(chrome_page))
    }

    /// Closes the browser and waits for the Chrome process to exit.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionFailed` if the close command fails.
    pub async fn close(self) -> Result<()> {
        let browser = self.inner.lock().await.take();

        if let Some(mut browser) = browser {
            debug!("closing browser");
            browser
                .close()
                .await
                .map_err(|e| BrowserError::ConnectionFailed(e.to_string()))?;
            if let Err(e) = browser.wait().await {
                warn!("browser process did not exit cleanly: {e}");
            }
        }

        Ok(())
    }

    /// Returns true if the browser has been closed.
    pub async fn is_closed(&self) -> bool {
        self.inner.lock().await.is_none()
    }
}

impl Drop for TestBrowser {
    fn drop(&mut self) {
        self.handler.abort();
        if self.inner.get_mut().is_some() {
            warn!("TestBrowser dropped without close(); relying on chromiumoxide to kill Chrome");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_args_are_headless_and_sandbox_free() {
        let config = TestBrowserConfig::default().with_headless(true);
        let args = config.chrome_args();

        assert_eq!(args[0], "--headless");
        assert!(args.contains(&"--window-size=1920,1080".to_string()));
        assert!(args.contains(&"--no-sandbox".to_string()));
    }

    #[test]
    fn visible_config_drops_headless_flag() {
        let config = TestBrowserConfig::new()
            .visible()
            .with_window_size(1280, 720)
            .with_args(vec!["--lang=en-US".into()]);
        let args = config.chrome_args();

        assert!(!args.iter().any(|a| a == "--headless"));
        assert!(args.contains(&"--window-size=1280,720".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("--lang=en-US"));
    }

    #[test]
    fn chrome_path_is_recorded() {
        let config = TestBrowserConfig::new().with_chrome_path("/usr/bin/chromium");
        assert_eq!(config.chrome_path, Some(PathBuf::from("/usr/bin/chromium")));
    }

    #[tokio::test]
    #[ignore] // Requires Chrome to be installed
    async fn browser_launch_and_close() {
        let browser = TestBrowser::launch(TestBrowserConfig::default())
            .await
            .expect("failed to launch browser");

        assert!(!browser.is_closed().await);

        browser.close().await.expect("failed to close browser");
    }
}
