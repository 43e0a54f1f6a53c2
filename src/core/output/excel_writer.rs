//! Excel output writer.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use crate::core::models::MessageRecord;
use crate::error::Result;

/// Maximum number of characters Excel accepts in one cell.
pub const EXCEL_CELL_LIMIT: usize = 32_767;

/// Data rows per worksheet: Excel's 1 048 576 row limit minus the header.
pub const EXCEL_SHEET_ROWS: usize = 1_048_575;

/// Writes records to an `.xlsx` workbook.
///
/// # Format
/// - Row 0 of every worksheet: bold header `Type`, `Content`, `Comment`
/// - One row per record, in order
/// - Records beyond [`EXCEL_SHEET_ROWS`] continue on a new worksheet, so a
///   snapshot of any size can be written
///
/// Cell text longer than [`EXCEL_CELL_LIMIT`] characters is truncated, since
/// the format cannot store it.
pub fn write_excel(records: &[MessageRecord], path: &Path) -> Result<()> {
    write_sheets(records, path, EXCEL_SHEET_ROWS)
}

fn write_sheets(records: &[MessageRecord], path: &Path, rows_per_sheet: usize) -> Result<()> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let pages: Vec<&[MessageRecord]> = if records.is_empty() {
        vec![records]
    } else {
        records.chunks(rows_per_sheet).collect()
    };

    for (page, chunk) in pages.into_iter().enumerate() {
        if page > 0 {
            tracing::info!(sheet = page + 1, "worksheet full, continuing on a new sheet");
        }
        let worksheet = workbook.add_worksheet();

        for (col, name) in MessageRecord::columns().iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *name, &header)?;
        }

        for (idx, record) in chunk.iter().enumerate() {
            let row = (idx + 1) as u32;
            for (col, cell) in record.cells().iter().enumerate() {
                worksheet.write_string(row, col as u16, fit_cell(cell, row))?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn fit_cell(text: &str, row: u32) -> &str {
    match text.char_indices().nth(EXCEL_CELL_LIMIT) {
        Some((cut, _)) => {
            tracing::warn!(row, chars = text.chars().count(), "cell truncated to Excel limit");
            &text[..cut]
        }
        None => text,
    }
}
