//! Core types for chatharvest.
//!
//! This module contains:
//! - [`models`] - Record shapes written to snapshots
//! - [`filter`] - Date window and keyword
//! - [`sanitize`] - Character filtering for spreadsheet-safe text
//! - [`snapshot`] - Checkpoint and final file persistence
//! - [`output`] - Format writers (Excel, Parquet)

pub mod filter;
pub mod models;
pub mod output;
pub mod sanitize;
pub mod snapshot;

pub use filter::{DateWindow, HarvestFilter, WindowPosition};
pub use models::{MessageRecord, Reply, ReplyRecord};
pub use sanitize::sanitize;
pub use snapshot::{FileSnapshotWriter, SnapshotKind, SnapshotWriter};

#[cfg(feature = "excel-output")]
pub use output::write_excel;
#[cfg(feature = "parquet-output")]
pub use output::write_parquet;
