//! Output format types for the chatharvest library.
//!
//! This module provides library-first format types that don't depend on CLI
//! frameworks. The CLI mirrors [`OutputFormat`] with a clap `ValueEnum`.
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "parquet-output")]
//! # fn example() -> chatharvest::Result<()> {
//! use chatharvest::format::{OutputFormat, write_to_format};
//! use chatharvest::MessageRecord;
//!
//! let records = vec![MessageRecord::new("Hello!", &[])?];
//!
//! write_to_format(&records, "snapshot.parquet".as_ref(), OutputFormat::Parquet)?;
//!
//! let format = OutputFormat::from_path("snapshot.xlsx")?;
//! assert_eq!(format, OutputFormat::Excel);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::models::MessageRecord;
use crate::error::HarvestError;

/// Snapshot file format.
///
/// - [`Excel`](OutputFormat::Excel) - `.xlsx` workbook, readable by hand
/// - [`Parquet`](OutputFormat::Parquet) - columnar file for data pipelines
///
/// # Example
///
/// ```rust
/// use chatharvest::format::OutputFormat;
/// use std::str::FromStr;
///
/// let format = OutputFormat::from_str("parquet").unwrap();
/// assert_eq!(format, OutputFormat::Parquet);
/// assert_eq!(format.extension(), "parquet");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Excel workbook (default)
    #[default]
    Excel,

    /// Apache Parquet
    Parquet,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    ///
    /// ```rust
    /// use chatharvest::format::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::Excel.extension(), "xlsx");
    /// assert_eq!(OutputFormat::Parquet.extension(), "parquet");
    /// ```
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Excel => "xlsx",
            OutputFormat::Parquet => "parquet",
        }
    }

    /// Returns all accepted format names.
    pub fn all_names() -> &'static [&'static str] {
        &["excel", "xlsx", "parquet"]
    }

    /// Returns all available formats.
    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Excel, OutputFormat::Parquet]
    }

    /// Cargo feature that enables the writer for this format.
    pub fn feature(&self) -> &'static str {
        match self {
            OutputFormat::Excel => "excel-output",
            OutputFormat::Parquet => "parquet-output",
        }
    }

    /// Detects format from a file path based on extension.
    pub fn from_path(path: &str) -> Result<Self, HarvestError> {
        let ext = path.rsplit('.').next().unwrap_or("").to_lowercase();

        match ext.as_str() {
            "xlsx" => Ok(OutputFormat::Excel),
            "parquet" => Ok(OutputFormat::Parquet),
            _ => Err(HarvestError::invalid_format(
                "output",
                format!("Unknown file extension: '.{}'. Expected one of: xlsx, parquet", ext),
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Excel => write!(f, "Excel"),
            OutputFormat::Parquet => write!(f, "Parquet"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "excel" | "xlsx" => Ok(OutputFormat::Excel),
            "parquet" => Ok(OutputFormat::Parquet),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                OutputFormat::all_names().join(", ")
            )),
        }
    }
}

/// Writes records to a file in the specified format.
///
/// # Errors
///
/// Returns an error if:
/// - The required feature for the format is not enabled
/// - The file cannot be written
#[allow(unused_variables)]
pub fn write_to_format(
    records: &[MessageRecord],
    path: &Path,
    format: OutputFormat,
) -> Result<(), HarvestError> {
    match format {
        #[cfg(feature = "excel-output")]
        OutputFormat::Excel => crate::core::output::write_excel(records, path),
        #[cfg(feature = "parquet-output")]
        OutputFormat::Parquet => crate::core::output::write_parquet(records, path),
        #[allow(unreachable_patterns)]
        _ => Err(HarvestError::invalid_format(
            "output",
            format!(
                "Output format {} requires the '{}' feature to be enabled",
                format,
                format.feature()
            ),
        )),
    }
}
