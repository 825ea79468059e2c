//! Browser abstraction for dashboard scraping.
//!
//! Defines the `Browser` and `PageSession` traits that abstract over the
//! browser engine (currently Chromium via chromiumoxide). One session is
//! launched per address and always torn down, success or failure.

pub mod chromium;

use async_trait::async_trait;

use crate::types::ScrapeResult;

/// A browser engine that can launch isolated page sessions.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Launch a fresh, isolated session (its own browser process).
    async fn open(&self) -> ScrapeResult<Box<dyn PageSession>>;
}

/// A single live page.
#[async_trait]
pub trait PageSession: Send + Sync {
    /// Navigate to a URL with a timeout. A timeout maps to
    /// `ScrapeError::NavigationTimeout`; any other navigation failure is
    /// fatal to the batch.
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> ScrapeResult<()>;

    /// Execute JavaScript in the page context and return the result.
    async fn evaluate(&self, script: &str) -> ScrapeResult<serde_json::Value>;

    /// Tear the session down, browser process included.
    async fn close(self: Box<Self>) -> ScrapeResult<()>;
}
