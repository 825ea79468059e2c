//! Chromium-based browser using chromiumoxide.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;

use super::{Browser, PageSession};
use crate::config::CHROMIUM_PATH_ENV;
use crate::types::{ScrapeError, ScrapeResult};

/// Find the Chromium binary path.
pub fn find_chromium(explicit: Option<&Path>) -> Option<PathBuf> {
    // 1. Explicit CLI flag
    if let Some(p) = explicit {
        if p.exists() {
            return Some(p.to_path_buf());
        }
    }

    // 2. ZKSCOUT_CHROMIUM env
    if let Ok(p) = std::env::var(CHROMIUM_PATH_ENV) {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 3. System PATH
    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    // 4. Common macOS location
    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Launcher for headless Chromium. Each `open()` spawns its own browser
/// process, so session cost is dominated by startup/shutdown per address.
pub struct ChromiumBrowser {
    executable: PathBuf,
}

impl ChromiumBrowser {
    /// Resolve the Chromium binary once; launch failures surface per session.
    pub fn discover(explicit: Option<&Path>) -> ScrapeResult<Self> {
        let executable = find_chromium(explicit).ok_or_else(|| {
            ScrapeError::Browser(anyhow!(
                "Chromium not found. Install Chrome/Chromium or set {CHROMIUM_PATH_ENV}."
            ))
        })?;
        Ok(Self { executable })
    }
}

#[async_trait]
impl Browser for ChromiumBrowser {
    async fn open(&self) -> ScrapeResult<Box<dyn PageSession>> {
        let config = BrowserConfig::builder()
            .chrome_executable(self.executable.clone())
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .build()
            .map_err(|e| ScrapeError::Browser(anyhow!("failed to build browser config: {e}")))?;

        let (browser, mut handler) = CdpBrowser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        // Drive the CDP event stream until the browser goes away
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("failed to create page")?;

        Ok(Box::new(ChromiumSession { browser, page }))
    }
}

/// One headless Chromium process with a single page.
pub struct ChromiumSession {
    browser: CdpBrowser,
    page: Page,
}

#[async_trait]
impl PageSession for ChromiumSession {
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> ScrapeResult<()> {
        let result = tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            self.page.goto(url),
        )
        .await;

        match result {
            Ok(Ok(_response)) => {
                let _ = self.page.wait_for_navigation().await;
                Ok(())
            }
            // A failed navigation (DNS, refused connection) is not a
            // timeout and must abort the batch.
            Ok(Err(e)) => Err(ScrapeError::Browser(anyhow!("navigation failed: {e}"))),
            Err(_) => Err(ScrapeError::NavigationTimeout(timeout_ms)),
        }
    }

    async fn evaluate(&self, script: &str) -> ScrapeResult<serde_json::Value> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| ScrapeError::Browser(anyhow!("JS evaluation failed: {e}")))?;

        result
            .into_value()
            .map_err(|e| ScrapeError::Browser(anyhow!("failed to convert JS result: {e:?}")))
    }

    async fn close(self: Box<Self>) -> ScrapeResult<()> {
        let ChromiumSession { mut browser, page } = *self;
        let _ = page.close().await;
        let _ = browser.close().await;
        Ok(())
    }
}
