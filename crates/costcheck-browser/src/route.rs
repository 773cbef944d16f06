//! Route stubs: canned responses for intercepted network requests.
//!
//! A [`RouteTable`] maps URL regexes to fixed responses. Once installed on a
//! page (see [`Page::install_routes`](crate::Page::install_routes)) every
//! request the page issues is paused via the CDP `Fetch` domain; a request
//! whose URL matches a stub is fulfilled with the stub's response, all other
//! requests continue to the network unchanged.
//!
//! Patterns use search semantics (a match anywhere in the URL counts), and
//! when several stubs match, the one registered last wins.

use crate::error::{BrowserError, Result};
use base64::prelude::{Engine as _, BASE64_STANDARD};
use chromiumoxide::cdp::browser_protocol::fetch::{
    ContinueRequestParams, EventRequestPaused, FulfillRequestParams, HeaderEntry, RequestId,
};
use chromiumoxide::page::Page as ChromePage;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Content type used by [`RouteResponse::json`].
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// The response a stub answers with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteResponse {
    /// HTTP status code.
    pub status: u16,
    /// Value of the `Content-Type` header.
    pub content_type: String,
    /// Response body, sent verbatim.
    pub body: String,
}

impl RouteResponse {
    /// Creates a response with an explicit status, content type and body.
    pub fn new(status: u16, content_type: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    /// A `200 application/json` response with the serialized value as body.
    #[must_use]
    pub fn json(body: &serde_json::Value) -> Self {
        Self::new(200, JSON_CONTENT_TYPE, body.to_string())
    }

    /// Builds the CDP command that answers a paused request with this response.
    ///
    /// # Errors
    ///
    /// Returns `RouteSetupFailed` if the command cannot be built.
    pub fn fulfill_params(&self, request_id: RequestId) -> Result<FulfillRequestParams> {
        FulfillRequestParams::builder()
            .request_id(request_id)
            .response_code(i64::from(self.status))
            .response_header(HeaderEntry::new("Content-Type", self.content_type.clone()))
            .body(BASE64_STANDARD.encode(self.body.as_bytes()))
            .build()
            .map_err(BrowserError::RouteSetupFailed)
    }
}

/// A single URL pattern with its canned response and a hit counter.
#[derive(Debug)]
pub struct RouteStub {
    pattern: Regex,
    response: RouteResponse,
    hits: AtomicUsize,
}

impl RouteStub {
    /// The pattern as written.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// The response served for matching requests.
    #[must_use]
    pub fn response(&self) -> &RouteResponse {
        &self.response
    }

    /// How many requests this stub has answered.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    /// Returns true if the URL matches this stub's pattern.
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        self.pattern.is_match(url)
    }
}

/// An ordered set of route stubs.
///
/// Cloning is cheap and clones share hit counters, so a table handed to a
/// page can still be inspected by the caller afterwards.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    stubs: Vec<Arc<RouteStub>>,
}

impl RouteTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a stub. Later registrations take precedence over earlier ones.
    ///
    /// # Errors
    ///
    /// Returns `RouteSetupFailed` if the pattern is not a valid regex.
    pub fn route(&mut self, pattern: &str, response: RouteResponse) -> Result<&mut Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| BrowserError::RouteSetupFailed(format!("invalid pattern '{pattern}': {e}")))?;
        self.stubs.push(Arc::new(RouteStub {
            pattern,
            response,
            hits: AtomicUsize::new(0),
        }));
        Ok(self)
    }

    /// Finds the stub answering a URL, without counting a hit.
    #[must_use]
    pub fn lookup(&self, url: &str) -> Option<&RouteStub> {
        self.stubs
            .iter()
            .rev()
            .find(|stub| stub.matches(url))
            .map(AsRef::as_ref)
    }

    /// Finds the stub answering a URL and counts the hit.
    #[must_use]
    pub fn fulfill(&self, url: &str) -> Option<&RouteResponse> {
        let stub = self.lookup(url)?;
        stub.hits.fetch_add(1, Ordering::Relaxed);
        Some(&stub.response)
    }

    /// Total hits across stubs registered with exactly this pattern.
    #[must_use]
    pub fn hits(&self, pattern: &str) -> usize {
        self.stubs
            .iter()
            .filter(|stub| stub.pattern() == pattern)
            .map(|stub| stub.hits())
            .sum()
    }

    /// Total number of requests answered by any stub.
    #[must_use]
    pub fn total_hits(&self) -> usize {
        self.stubs.iter().map(|stub| stub.hits()).sum()
    }

    /// Iterates stubs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteStub> {
        self.stubs.iter().map(AsRef::as_ref)
    }

    /// Number of registered stubs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stubs.len()
    }

    /// Returns true if no stubs are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stubs.is_empty()
    }
}

impl fmt::Display for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stub in self.iter() {
            writeln!(f, "{} -> {}", stub.pattern(), stub.response().status)?;
        }
        Ok(())
    }
}

/// Answers one paused request: fulfill it from the table or let it through.
pub(crate) async fn answer(
    page: &ChromePage,
    routes: &RouteTable,
    event: &EventRequestPaused,
) -> Result<()> {
    let url = event.request.url.as_str();

    match routes.fulfill(url) {
        Some(response) => {
            debug!(url, status = response.status, "fulfilling stubbed request");
            page.execute(response.fulfill_params(event.request_id.clone())?)
                .await?;
        }
        None => {
            trace!(url, "continuing unstubbed request");
            page.execute(ContinueRequestParams::new(event.request_id.clone()))
                .await?;
        }
    }

    Ok(())
}
