//! Append-only xlsx results store.
//!
//! The results file is a durable, growable log across runs: the header row
//! is written exactly once when the file is created, and every append lands
//! below the current last row of the "Results" sheet. Each call opens and
//! closes the workbook, so a crash mid-run leaves a valid partial file.

use std::path::Path;

use anyhow::{anyhow, Result};
use umya_spreadsheet::Spreadsheet;

use crate::types::ActivityRecord;

pub const SHEET_NAME: &str = "Results";

pub const HEADERS: [&str; 9] = [
    "id",
    "address",
    "interactions",
    "volume",
    "fee_spent",
    "last_activity",
    "activity_day",
    "activity_week",
    "activity_month",
];

/// Append one record, creating the file with a header row if it is absent.
pub fn append_record(path: &Path, record: &ActivityRecord) -> Result<()> {
    let mut book = if path.exists() {
        umya_spreadsheet::reader::xlsx::read(path)
            .map_err(|e| anyhow!("failed to open results file {}: {e}", path.display()))?
    } else {
        tracing::info!("File {} does not exist. Creating a new one...", path.display());
        new_results_book()?
    };

    let sheet = book.get_sheet_by_name_mut(SHEET_NAME).ok_or_else(|| {
        anyhow!(
            "results file {} has no '{SHEET_NAME}' sheet",
            path.display()
        )
    })?;

    let row = sheet.get_highest_row() + 1;
    sheet
        .get_cell_mut((1u32, row))
        .set_value_number(f64::from(record.id));
    sheet.get_cell_mut((2u32, row)).set_value(record.address.as_str());
    sheet
        .get_cell_mut((3u32, row))
        .set_value(record.interactions.as_str());
    sheet.get_cell_mut((4u32, row)).set_value(record.volume.as_str());
    sheet
        .get_cell_mut((5u32, row))
        .set_value(record.fee_spent.as_str());
    sheet
        .get_cell_mut((6u32, row))
        .set_value(record.last_activity.as_str());
    sheet
        .get_cell_mut((7u32, row))
        .set_value(record.activity_day.as_str());
    sheet
        .get_cell_mut((8u32, row))
        .set_value(record.activity_week.as_str());
    sheet
        .get_cell_mut((9u32, row))
        .set_value(record.activity_month.as_str());

    umya_spreadsheet::writer::xlsx::write(&book, path)
        .map_err(|e| anyhow!("failed to write results file {}: {e}", path.display()))?;

    Ok(())
}

/// Fresh workbook with the "Results" sheet and its header row.
fn new_results_book() -> Result<Spreadsheet> {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book
        .get_sheet_mut(&0)
        .ok_or_else(|| anyhow!("fresh workbook has no sheet"))?;
    sheet.set_name(SHEET_NAME);
    for (i, header) in HEADERS.iter().enumerate() {
        sheet.get_cell_mut((i as u32 + 1, 1u32)).set_value(*header);
    }
    Ok(book)
}
