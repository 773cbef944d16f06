//! # costcheck-browser
//!
//! Headless Chrome automation built on chromiumoxide, sized for smoke tests
//! that drive a real frontend against stubbed backend responses.
//!
//! ## Architecture
//!
//! - **TestBrowser**: launches Chrome and owns the process; `close` consumes it
//! - **Page**: a tab with navigation, locators, local storage and screenshots
//! - **RouteTable**: URL-regex route stubs answered through CDP `Fetch`
//! - **Locator**: CSS or `text=` element lookup with visibility checks
//! - **ConsoleCapture**: console messages recorded per page
//! - **DevServer**: the frontend under test, addressed by base URL
//! - **WaitConfig**: timeouts and poll intervals for every wait
//!
//! ## Example
//!
//! ```ignore
//! use costcheck_browser::{Locator, RouteResponse, RouteTable, TestBrowser, TestBrowserConfig, WaitConfig};
//! use serde_json::json;
//!
//! let mut routes = RouteTable::new();
//! routes.route(r".*/api/sync/status", RouteResponse::json(&json!({"active": false})))?;
//!
//! let browser = TestBrowser::launch(TestBrowserConfig::default()).await?;
//! let page = browser.new_page().await?;
//! page.install_routes(routes.clone()).await?;
//! page.navigate("http://localhost:5173/").await?;
//! page.expect_visible(&Locator::text("Dashboard"), WaitConfig::expect()).await?;
//! browser.close().await?;
//! ```
//!
//! ## Testing
//!
//! Unit tests cover everything that does not need Chrome (locator scripts,
//! route matching, waits). Tests that launch a browser are `#[ignore]`d; run
//! them with `cargo test -p costcheck-browser -- --ignored`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod browser;
pub mod console;
pub mod error;
pub mod locator;
pub mod page;
pub mod route;
pub mod server;
pub mod wait;

pub use browser::{TestBrowser, TestBrowserConfig};
pub use console::{ConsoleCapture, ConsoleLevel, ConsoleMessage};
pub use error::{BrowserError, Result};
pub use locator::Locator;
pub use page::Page;
pub use route::{RouteResponse, RouteStub, RouteTable, JSON_CONTENT_TYPE};
pub use server::{DevServer, StaticUrlServer};
pub use wait::{
    wait_for, wait_for_result, WaitConfig, DEFAULT_EXPECT_TIMEOUT, DEFAULT_POLL_INTERVAL,
    DEFAULT_TIMEOUT,
};
