//! Post-navigation settle policy.
//!
//! The dashboard renders client-side, so extraction must wait for the page
//! to settle. The default is an unconditional fixed delay; waiting for a
//! concrete selector is available as an alternative strategy.

use std::time::Duration;

use crate::config::DEFAULT_SETTLE_MS;
use crate::renderer::PageSession;
use crate::types::{ScrapeError, ScrapeResult};

/// Poll interval while waiting for a selector.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// How long to wait after navigation before extracting.
#[derive(Debug, Clone)]
pub enum SettlePolicy {
    /// Sleep for a fixed duration regardless of page state.
    FixedDelay(Duration),
    /// Poll until the CSS selector matches, bounded by `max_wait`.
    WaitForSelector { selector: String, max_wait: Duration },
}

impl Default for SettlePolicy {
    fn default() -> Self {
        Self::FixedDelay(Duration::from_millis(DEFAULT_SETTLE_MS))
    }
}

impl SettlePolicy {
    pub async fn settle(&self, page: &dyn PageSession) -> ScrapeResult<()> {
        match self {
            Self::FixedDelay(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(())
            }
            Self::WaitForSelector { selector, max_wait } => {
                let script = format!(
                    "document.querySelector({}) !== null",
                    serde_json::Value::from(selector.as_str())
                );
                let deadline = tokio::time::Instant::now() + *max_wait;
                loop {
                    if page.evaluate(&script).await?.as_bool().unwrap_or(false) {
                        return Ok(());
                    }
                    if tokio::time::Instant::now() >= deadline {
                        return Err(ScrapeError::ElementNotFound(selector.clone()));
                    }
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StaticPage {
        selector_present: bool,
    }

    #[async_trait]
    impl PageSession for StaticPage {
        async fn navigate(&mut self, _url: &str, _timeout_ms: u64) -> ScrapeResult<()> {
            Ok(())
        }

        async fn evaluate(&self, _script: &str) -> ScrapeResult<serde_json::Value> {
            Ok(serde_json::Value::Bool(self.selector_present))
        }

        async fn close(self: Box<Self>) -> ScrapeResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_default_is_fixed_delay() {
        match SettlePolicy::default() {
            SettlePolicy::FixedDelay(delay) => {
                assert_eq!(delay, Duration::from_millis(DEFAULT_SETTLE_MS));
            }
            other => panic!("unexpected default policy: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_wait_for_selector_found() {
        let page = StaticPage {
            selector_present: true,
        };
        let policy = SettlePolicy::WaitForSelector {
            selector: "h3.text-blue-600".to_string(),
            max_wait: Duration::from_millis(100),
        };
        policy.settle(&page).await.expect("selector should be found");
    }

    #[tokio::test]
    async fn test_wait_for_selector_deadline() {
        let page = StaticPage {
            selector_present: false,
        };
        let policy = SettlePolicy::WaitForSelector {
            selector: "h3.missing".to_string(),
            max_wait: Duration::from_millis(1),
        };
        let err = policy.settle(&page).await.unwrap_err();
        assert!(matches!(err, ScrapeError::ElementNotFound(_)));
    }
}
