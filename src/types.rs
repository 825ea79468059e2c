//! Core data types for the scrape pipeline.

use serde::Serialize;

/// The seven fields pulled off the dashboard page, before they are joined
/// with the address that produced them. All values are raw display text —
/// the site's own formatting is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawFields {
    pub interactions: String,
    pub volume: String,
    pub fee_spent: String,
    pub last_activity: String,
    pub activity_day: String,
    pub activity_week: String,
    pub activity_month: String,
}

/// One address's extracted metrics — a single row in the results file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityRecord {
    /// 1-based position of the address in the input file.
    pub id: u32,
    pub address: String,
    pub interactions: String,
    pub volume: String,
    pub fee_spent: String,
    pub last_activity: String,
    pub activity_day: String,
    pub activity_week: String,
    pub activity_month: String,
}

impl ActivityRecord {
    /// Join extracted fields with the address they were scraped for.
    pub fn from_fields(id: u32, address: &str, fields: RawFields) -> Self {
        Self {
            id,
            address: address.to_string(),
            interactions: fields.interactions,
            volume: fields.volume,
            fee_spent: fields.fee_spent,
            last_activity: fields.last_activity,
            activity_day: fields.activity_day,
            activity_week: fields.activity_week,
            activity_month: fields.activity_month,
        }
    }
}

/// Counts reported at the end of a run. Derived, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub errors: usize,
}

/// All errors that can occur while scraping one address.
///
/// Only `ElementNotFound` and `NavigationTimeout` are recoverable: the run
/// tallies them and moves on to the next address. Every other variant
/// aborts the whole batch.
#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("navigation timed out after {0}ms")]
    NavigationTimeout(u64),

    #[error("unexpected field format: {0}")]
    UnexpectedFormat(String),

    #[error("browser error: {0}")]
    Browser(#[from] anyhow::Error),
}

impl ScrapeError {
    /// Whether the run may tally this error and continue with the next
    /// address. Keep this set narrow: a malformed address producing any
    /// other failure kind must abort the batch, not be silently skipped.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ScrapeError::ElementNotFound(_) | ScrapeError::NavigationTimeout(_)
        )
    }
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;
