//! Fixed-position DOM extraction.
//!
//! The dashboard has no stable semantic markup, so fields are read from
//! known positions: the first three "blue headline" elements and four
//! absolute XPath locations in the activity list. Any layout change on the
//! site breaks this — the `Extractor` trait keeps the selector strategy
//! swappable without touching orchestration.

use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::Value;

use crate::renderer::PageSession;
use crate::types::{RawFields, ScrapeError, ScrapeResult};

/// Selector matching the interactions/volume/fee headline trio.
pub const HEADLINE_SELECTOR: &str = "h3.text-blue-600";

/// Absolute positions of last/day/week/month activity, in that order.
const ACTIVITY_XPATHS: [&str; 4] = [
    "/html/body/div[1]/main/div/div/div[2]/div[2]/div/ul/li[1]/div/div[2]",
    "/html/body/div[1]/main/div/div/div[2]/div[2]/div/ul/li[2]/div/div[2]",
    "/html/body/div[1]/main/div/div/div[2]/div[2]/div/ul/li[3]/div/div[2]",
    "/html/body/div[1]/main/div/div/div[2]/div[2]/div/ul/li[4]/div/div[2]",
];

/// Pulls the raw field set off a rendered page.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, page: &dyn PageSession) -> ScrapeResult<RawFields>;
}

/// Extractor reading the dashboard's fixed DOM positions via page JS.
pub struct FixedPositionExtractor;

impl FixedPositionExtractor {
    async fn headline_texts(&self, page: &dyn PageSession) -> ScrapeResult<Vec<String>> {
        let script = format!(
            "Array.from(document.querySelectorAll({})).map(el => (el.innerText || el.textContent || '').trim())",
            Value::from(HEADLINE_SELECTOR)
        );
        let value = page.evaluate(&script).await?;
        serde_json::from_value(value)
            .map_err(|e| ScrapeError::Browser(anyhow!("headline query returned non-array: {e}")))
    }

    async fn xpath_text(&self, page: &dyn PageSession, xpath: &str) -> ScrapeResult<String> {
        let script = format!(
            "(() => {{ const n = document.evaluate({}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue; return n ? (n.innerText || n.textContent || '').trim() : null; }})()",
            Value::from(xpath)
        );
        match page.evaluate(&script).await? {
            Value::String(text) => Ok(text),
            _ => Err(ScrapeError::ElementNotFound(xpath.to_string())),
        }
    }
}

#[async_trait]
impl Extractor for FixedPositionExtractor {
    async fn extract(&self, page: &dyn PageSession) -> ScrapeResult<RawFields> {
        let headlines = self.headline_texts(page).await?;
        if headlines.len() < 3 {
            return Err(ScrapeError::ElementNotFound(format!(
                "{HEADLINE_SELECTOR} (want 3, found {})",
                headlines.len()
            )));
        }

        let volume = text_after_dollar(&headlines[1])?;
        let fee_spent = text_after_dollar(&headlines[2])?;

        let last_activity = self.xpath_text(page, ACTIVITY_XPATHS[0]).await?;
        let activity_day = self.xpath_text(page, ACTIVITY_XPATHS[1]).await?;
        let activity_week = self.xpath_text(page, ACTIVITY_XPATHS[2]).await?;
        let activity_month = self.xpath_text(page, ACTIVITY_XPATHS[3]).await?;

        Ok(RawFields {
            interactions: headlines[0].clone(),
            volume,
            fee_spent,
            last_activity,
            activity_day,
            activity_week,
            activity_month,
        })
    }
}

/// Keep only the text after the first `$`, verbatim. A dollar field with no
/// `$` at all means the page structure changed under us — fatal, not a
/// per-address skip.
pub fn text_after_dollar(text: &str) -> ScrapeResult<String> {
    match text.split_once('$') {
        Some((_, rest)) => Ok(rest.to_string()),
        None => Err(ScrapeError::UnexpectedFormat(format!("no '$' in {text:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedPage;

    #[async_trait]
    impl PageSession for CannedPage {
        async fn navigate(&mut self, _url: &str, _timeout_ms: u64) -> ScrapeResult<()> {
            Ok(())
        }

        async fn evaluate(&self, script: &str) -> ScrapeResult<Value> {
            if script.contains("querySelectorAll") {
                return Ok(serde_json::json!(["42", "Volume $1,234.56", "Fees $0.42"]));
            }
            for (i, xpath) in ACTIVITY_XPATHS.iter().enumerate() {
                if script.contains(xpath) {
                    return Ok(Value::from(format!("activity-{i}")));
                }
            }
            Ok(Value::Null)
        }

        async fn close(self: Box<Self>) -> ScrapeResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_extract_fixed_positions() {
        let fields = FixedPositionExtractor
            .extract(&CannedPage)
            .await
            .expect("extraction failed");
        assert_eq!(fields.interactions, "42");
        assert_eq!(fields.volume, "1,234.56");
        assert_eq!(fields.fee_spent, "0.42");
        assert_eq!(fields.last_activity, "activity-0");
        assert_eq!(fields.activity_month, "activity-3");
    }

    struct EmptyPage;

    #[async_trait]
    impl PageSession for EmptyPage {
        async fn navigate(&mut self, _url: &str, _timeout_ms: u64) -> ScrapeResult<()> {
            Ok(())
        }

        async fn evaluate(&self, script: &str) -> ScrapeResult<Value> {
            if script.contains("querySelectorAll") {
                return Ok(serde_json::json!([]));
            }
            Ok(Value::Null)
        }

        async fn close(self: Box<Self>) -> ScrapeResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_extract_missing_headlines() {
        let err = FixedPositionExtractor
            .extract(&EmptyPage)
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::ElementNotFound(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_text_after_dollar_strips_prefix() {
        assert_eq!(text_after_dollar("$1,234.56").unwrap(), "1,234.56");
        assert_eq!(text_after_dollar("Volume $12.00").unwrap(), "12.00");
    }

    #[test]
    fn test_text_after_dollar_keeps_embedded_dollar() {
        // Only the first '$' splits; the rest of the string is untouched.
        assert_eq!(text_after_dollar("$1$2").unwrap(), "1$2");
    }

    #[test]
    fn test_text_after_dollar_missing_is_fatal() {
        let err = text_after_dollar("1,234.56").unwrap_err();
        assert!(matches!(err, ScrapeError::UnexpectedFormat(_)));
        assert!(!err.is_recoverable());
    }
}
