//! # Chatharvest
//!
//! A Rust library for collecting channel posts and their reply threads from a
//! messaging platform into a flat dataset.
//!
//! ## Overview
//!
//! A run visits a list of channels in order. From each it pulls messages
//! newest first, keeps those inside an inclusive date window (and matching an
//! optional keyword), attaches each post's reply thread, and appends one
//! record per post. The run is bounded by a message quota and a wall-clock
//! budget, paced by a minimum time per channel, and checkpointed to disk every
//! N records. It always ends with one final snapshot file.
//!
//! The platform sits behind the [`MessageSource`](source::MessageSource)
//! trait and the output behind [`SnapshotWriter`](core::snapshot::SnapshotWriter).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatharvest::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let window = DateWindow::from_dates("2024-01-01", "2024-01-31")?;
//!     let config = RunConfig::new(parse_channels("@news,@sports"), HarvestFilter::new(window))
//!         .with_max_messages(5_000)
//!         .with_format(OutputFormat::Parquet);
//!
//!     let source = ExportSource::new("exports");
//!     let report = Harvester::with_file_output(source, config).run().await?;
//!
//!     println!("{} posts written to {}", report.total(), report.output.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Output
//!
//! Every snapshot has three columns:
//!
//! | Column | Content |
//! |--------|---------|
//! | `Type` | always `text` |
//! | `Content` | post text |
//! | `Comment` | JSON array of `{"Comment Content": ...}` objects |
//!
//! Text is stripped of characters spreadsheets cannot store before it is
//! written (see [`core::sanitize`]).
//!
//! ## Module Structure
//!
//! - [`harvest`] - the run loop ([`Harvester`](harvest::Harvester)) and its outcome types
//! - [`source`] - [`MessageSource`](source::MessageSource), [`MemorySource`](source::MemorySource),
//!   `ExportSource`
//! - [`core`] - records, date window, sanitizer, snapshots, format writers
//! - [`config`] - [`RunConfig`](config::RunConfig)
//! - [`format`] - [`OutputFormat`](format::OutputFormat)
//! - [`progress`] - progress estimation and callbacks
//! - [`message`] - [`RemoteMessage`], [`Reaction`]
//! - [`error`] - [`HarvestError`], [`Result`]
//! - [`prelude`] - convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod harvest;
#[cfg(feature = "cli")]
pub mod logging;
pub mod message;
pub mod progress;
pub mod source;

// Re-export the main types at the crate root for convenience
pub use core::models::MessageRecord;
pub use error::{HarvestError, Result};
pub use message::{Reaction, RemoteMessage};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatharvest::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{MessageRecord, Reaction, RemoteMessage};

    pub use crate::error::{HarvestError, Result};

    pub use crate::config::{RunConfig, parse_channels};

    pub use crate::core::filter::{DateWindow, HarvestFilter};

    pub use crate::core::snapshot::{FileSnapshotWriter, SnapshotWriter};

    pub use crate::format::OutputFormat;

    pub use crate::harvest::{ChannelEnd, HarvestReport, Harvester, StopReason};

    pub use crate::progress::{ProgressCallback, ProgressUpdate};

    #[cfg(feature = "export-source")]
    pub use crate::source::ExportSource;
    pub use crate::source::{MemorySource, MessageSource};
}
