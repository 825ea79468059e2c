//! Batch orchestration: addresses in, spreadsheet rows out.
//!
//! Strictly sequential — one address at a time, one fresh browser per
//! address, one independent append per success. The only state shared
//! across iterations is the error tally and the output file.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::config::ScoutConfig;
use crate::extract::Extractor;
use crate::renderer::{Browser, PageSession};
use crate::settle::SettlePolicy;
use crate::sheet;
use crate::types::{ActivityRecord, RawFields, RunSummary, ScrapeResult};

/// Read the address list: one opaque token per line, input order kept,
/// duplicates and blank lines included. Only each line's trailing newline
/// is stripped — no trimming, no validation.
pub fn load_addresses(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if content.is_empty() {
        return Ok(Vec::new());
    }
    let mut lines: Vec<String> = content.split('\n').map(str::to_string).collect();
    if content.ends_with('\n') {
        lines.pop();
    }
    Ok(lines)
}

/// Drives the scrape pipeline for a whole address list.
pub struct Scraper {
    browser: Box<dyn Browser>,
    extractor: Box<dyn Extractor>,
    settle: SettlePolicy,
    dashboard_url: String,
    nav_timeout_ms: u64,
}

impl Scraper {
    pub fn new(
        browser: Box<dyn Browser>,
        extractor: Box<dyn Extractor>,
        config: ScoutConfig,
    ) -> Self {
        Self {
            browser,
            extractor,
            settle: config.settle,
            dashboard_url: config.dashboard_url,
            nav_timeout_ms: config.nav_timeout_ms,
        }
    }

    /// Per-address dashboard URL. The address is interpolated verbatim —
    /// no URL-encoding, so reserved characters produce a malformed request.
    pub fn address_url(&self, address: &str) -> String {
        format!("{}?address={}", self.dashboard_url, address)
    }

    /// Scrape one address in a fresh, isolated browser session. The session
    /// is torn down whether or not the scrape succeeds.
    pub async fn fetch_one(&self, id: u32, address: &str) -> ScrapeResult<ActivityRecord> {
        let mut page = self.browser.open().await?;
        let outcome = self.scrape(page.as_mut(), address).await;
        let closed = page.close().await;
        let fields = outcome?;
        closed?;
        Ok(ActivityRecord::from_fields(id, address, fields))
    }

    async fn scrape(&self, page: &mut dyn PageSession, address: &str) -> ScrapeResult<RawFields> {
        page.navigate(&self.address_url(address), self.nav_timeout_ms)
            .await?;
        self.settle.settle(&*page).await?;
        self.extractor.extract(&*page).await
    }

    /// Run the whole batch, appending one row per successful address and
    /// tallying recoverable failures. Any non-recoverable error aborts.
    pub async fn run(&self, input: &Path, output: &Path) -> Result<RunSummary> {
        info!("Started.");

        if !input.exists() {
            error!(
                "The {} file does not exist. Please provide a valid input file.",
                input.display()
            );
            return Ok(RunSummary { total: 0, errors: 0 });
        }

        let addresses = load_addresses(input)?;
        let total = addresses.len();
        let mut errors = 0usize;

        for (position, address) in addresses.iter().enumerate() {
            let id = position as u32 + 1;
            match self.fetch_one(id, address).await {
                Ok(record) => {
                    sheet::append_record(output, &record)?;
                    info!(
                        "Address: {address} with volume: {} has been parsed and added to the results file.",
                        record.volume
                    );
                }
                Err(e) if e.is_recoverable() => {
                    errors += 1;
                    error!("Error while processing address {address}: {e}");
                }
                Err(e) => return Err(e.into()),
            }
        }

        if errors != 0 {
            info!("{errors}/{total} addresses was checked with errors!");
        } else {
            info!("All addresses are successfully checked.");
        }

        Ok(RunSummary { total, errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_input(content: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_addresses_keeps_order_and_blanks() {
        let (_dir, path) = write_input(b"0xAAA\n\n 0xBBB \n0xAAA\n");
        let addresses = load_addresses(&path).unwrap();
        // Blank lines, surrounding whitespace, and duplicates all survive.
        assert_eq!(addresses, vec!["0xAAA", "", " 0xBBB ", "0xAAA"]);
    }

    #[test]
    fn test_load_addresses_no_trailing_newline() {
        let (_dir, path) = write_input(b"0xAAA\n0xBBB");
        let addresses = load_addresses(&path).unwrap();
        assert_eq!(addresses, vec!["0xAAA", "0xBBB"]);
    }

    #[test]
    fn test_load_addresses_empty_file() {
        let (_dir, path) = write_input(b"");
        assert!(load_addresses(&path).unwrap().is_empty());
    }

    struct NoBrowser;

    #[async_trait::async_trait]
    impl Browser for NoBrowser {
        async fn open(&self) -> ScrapeResult<Box<dyn PageSession>> {
            Err(crate::types::ScrapeError::Browser(anyhow::anyhow!(
                "no browser in this test"
            )))
        }
    }

    #[test]
    fn test_address_url_is_verbatim() {
        let scraper = Scraper::new(
            Box::new(NoBrowser),
            Box::new(crate::extract::FixedPositionExtractor),
            ScoutConfig::default(),
        );
        assert_eq!(
            scraper.address_url("0xAAA"),
            "https://byfishh.github.io/zk-flow/?address=0xAAA"
        );
        // Reserved characters pass through untouched.
        assert_eq!(
            scraper.address_url("a b&c"),
            "https://byfishh.github.io/zk-flow/?address=a b&c"
        );
    }
}
