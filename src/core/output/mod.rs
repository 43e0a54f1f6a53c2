//! Output format writers.
//!
//! This module provides writers for the snapshot formats:
//! - [`write_excel`] - `.xlsx` workbook, a new sheet per [`EXCEL_SHEET_ROWS`] rows -
//!   requires `excel-output` feature
//! - [`write_parquet`] - `.parquet` file, one row group - requires `parquet-output` feature
//!
//! Both write the same three columns: `Type`, `Content`, `Comment`, one row per
//! [`MessageRecord`](crate::core::models::MessageRecord), in record order.
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "excel-output", feature = "parquet-output"))]
//! # fn main() -> chatharvest::Result<()> {
//! use chatharvest::core::output::{write_excel, write_parquet};
//! use chatharvest::MessageRecord;
//!
//! let records = vec![MessageRecord::new("Hello!", &[])?];
//!
//! write_excel(&records, "snapshot.xlsx".as_ref())?;
//! write_parquet(&records, "snapshot.parquet".as_ref())?;
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "excel-output", feature = "parquet-output")))]
//! # fn main() {}
//! ```

#[cfg(feature = "excel-output")]
mod excel_writer;
#[cfg(feature = "parquet-output")]
mod parquet_writer;

#[cfg(feature = "excel-output")]
pub use excel_writer::{EXCEL_CELL_LIMIT, EXCEL_SHEET_ROWS, write_excel};
#[cfg(feature = "parquet-output")]
pub use parquet_writer::{record_batch, write_parquet};
