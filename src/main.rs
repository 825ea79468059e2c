// Copyright 2026 ZkScout Contributors
// SPDX-License-Identifier: Apache-2.0

//! zkscout — entry point.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use zkscout::config::{self, ScoutConfig};
use zkscout::extract::FixedPositionExtractor;
use zkscout::renderer::chromium::ChromiumBrowser;
use zkscout::scraper::Scraper;
use zkscout::settle::SettlePolicy;

#[derive(Parser)]
#[command(
    name = "zkscout",
    about = "Scrape zk-flow wallet activity for a list of addresses into a spreadsheet",
    version
)]
struct Cli {
    /// Path to the input .txt file, one address per line.
    #[arg(default_value = config::DEFAULT_INPUT)]
    input: PathBuf,

    /// Path to the output .xlsx results file.
    #[arg(default_value = config::DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Fixed settle delay after navigation, in milliseconds.
    #[arg(long, default_value_t = config::DEFAULT_SETTLE_MS)]
    settle_ms: u64,

    /// Wait for this CSS selector instead of sleeping a fixed delay.
    #[arg(long)]
    wait_for: Option<String>,

    /// Navigation timeout, in milliseconds.
    #[arg(long, default_value_t = config::DEFAULT_NAV_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Chromium binary to use (also the ZKSCOUT_CHROMIUM env var).
    #[arg(long)]
    chromium: Option<PathBuf>,

    /// Base URL of the dashboard.
    #[arg(long, default_value = config::DEFAULT_DASHBOARD_URL)]
    dashboard_url: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let settle = match cli.wait_for {
        Some(selector) => SettlePolicy::WaitForSelector {
            selector,
            max_wait: Duration::from_millis(cli.timeout_ms),
        },
        None => SettlePolicy::FixedDelay(Duration::from_millis(cli.settle_ms)),
    };

    let browser = ChromiumBrowser::discover(cli.chromium.as_deref())?;
    let scraper = Scraper::new(
        Box::new(browser),
        Box::new(FixedPositionExtractor),
        ScoutConfig {
            dashboard_url: cli.dashboard_url,
            nav_timeout_ms: cli.timeout_ms,
            settle,
        },
    );

    scraper.run(&cli.input, &cli.output).await?;

    Ok(())
}
