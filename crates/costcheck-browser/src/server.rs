//! The frontend under test.
//!
//! Pages navigate relative to a [`DevServer`], which knows its base URL and
//! can optionally confirm it is up before the first navigation. The
//! verification flow points a [`StaticUrlServer`] at an already-running dev
//! server (Vite on `localhost:5173` by default).

use crate::error::Result;
use async_trait::async_trait;
use std::fmt;

/// A running frontend that pages can navigate to.
#[async_trait]
pub trait DevServer: Send + Sync {
    /// Base URL of the server, e.g. `http://localhost:5173`.
    fn base_url(&self) -> &str;

    /// Confirms the server is responsive. The default assumes it is.
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    /// Joins a path onto the base URL with exactly one slash between them.
    fn url(&self, path: &str) -> String {
        let base = self.base_url().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

impl fmt::Debug for dyn DevServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DevServer")
            .field("base_url", &self.base_url())
            .finish()
    }
}

/// A server that is started and stopped outside this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticUrlServer {
    base_url: String,
}

impl StaticUrlServer {
    /// Creates a server handle for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl DevServer for StaticUrlServer {
    fn base_url(&self) -> &str {
        &self.base_url
    }
}
