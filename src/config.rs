//! Defaults and run configuration.

use crate::settle::SettlePolicy;

/// Default input file when no positional argument is given.
pub const DEFAULT_INPUT: &str = "input.txt";

/// Default output file when no positional argument is given.
pub const DEFAULT_OUTPUT: &str = "output.xlsx";

/// Base URL of the dashboard, queried as `<base>?address=<address>`.
pub const DEFAULT_DASHBOARD_URL: &str = "https://byfishh.github.io/zk-flow/";

/// Fixed settle delay applied after navigation, in milliseconds.
pub const DEFAULT_SETTLE_MS: u64 = 4000;

/// Navigation timeout, in milliseconds.
pub const DEFAULT_NAV_TIMEOUT_MS: u64 = 30_000;

/// Env var overriding the Chromium binary path.
pub const CHROMIUM_PATH_ENV: &str = "ZKSCOUT_CHROMIUM";

/// Everything the scraper needs besides the browser and extractor.
#[derive(Debug, Clone)]
pub struct ScoutConfig {
    pub dashboard_url: String,
    pub nav_timeout_ms: u64,
    pub settle: SettlePolicy,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            dashboard_url: DEFAULT_DASHBOARD_URL.to_string(),
            nav_timeout_ms: DEFAULT_NAV_TIMEOUT_MS,
            settle: SettlePolicy::default(),
        }
    }
}
