//! Unified error types for chatharvest.
//!
//! This module provides a single [`HarvestError`] enum that covers all error
//! cases in the library.
//!
//! # Where errors surface
//!
//! Most failures during a run never reach the caller. Reply streams degrade to
//! an empty list, bad messages are skipped and failing channels are logged and
//! passed over. What is left for [`HarvestError`] is:
//!
//! - **Configuration** errors, rejected before the run starts
//! - **Source** errors, returned by a [`MessageSource`](crate::source::MessageSource)
//!   and absorbed by the channel fault boundary
//! - **Output** errors from the snapshot writers

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatharvest operations.
///
/// # Example
///
/// ```rust
/// use chatharvest::error::Result;
/// use chatharvest::MessageRecord;
///
/// fn my_function() -> Result<Vec<MessageRecord>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, HarvestError>;

/// The error type for all chatharvest operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HarvestError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - An export file doesn't exist
    /// - The output directory is not writable
    /// - Disk is full (when writing a snapshot)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing/serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid date in the run configuration.
    ///
    /// Dates are expected in YYYY-MM-DD format.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// A run parameter is out of range or inconsistent.
    #[error("Invalid configuration for '{field}': {message}")]
    InvalidConfig {
        /// Name of the offending parameter
        field: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// The remote source failed while serving a channel.
    #[error("Source error in '{channel}': {message}")]
    Source {
        /// Channel identifier the failure belongs to
        channel: String,
        /// Description reported by the source
        message: String,
    },

    /// The channel could not be resolved by the source.
    #[error("Channel not found: '{channel}'{}", path.as_ref().map(|p| format!(" (looked in: {})", p.display())).unwrap_or_default())]
    ChannelNotFound {
        /// Channel identifier as configured
        channel: String,
        /// Location that was searched, if the source is file backed
        path: Option<PathBuf>,
    },

    /// The output format is unknown or not compiled in.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// Excel workbook error.
    #[cfg(feature = "excel-output")]
    #[error("Excel error: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),

    /// Parquet file error.
    #[cfg(feature = "parquet-output")]
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Arrow record batch error.
    #[cfg(feature = "parquet-output")]
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl HarvestError {
    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        HarvestError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(field: &'static str, message: impl Into<String>) -> Self {
        HarvestError::InvalidConfig {
            field,
            message: message.into(),
        }
    }

    /// Creates a source error for a channel.
    pub fn remote(channel: impl Into<String>, message: impl Into<String>) -> Self {
        HarvestError::Source {
            channel: channel.into(),
            message: message.into(),
        }
    }

    /// Creates a channel-not-found error.
    pub fn channel_not_found(channel: impl Into<String>, path: Option<PathBuf>) -> Self {
        HarvestError::ChannelNotFound {
            channel: channel.into(),
            path,
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        HarvestError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, HarvestError::Io(_))
    }

    /// Returns `true` if this error was rejected at the configuration boundary.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            HarvestError::InvalidConfig { .. } | HarvestError::InvalidDate { .. }
        )
    }

    /// Returns `true` if this error came from the remote source.
    pub fn is_source(&self) -> bool {
        matches!(
            self,
            HarvestError::Source { .. } | HarvestError::ChannelNotFound { .. }
        )
    }

    /// Returns `true` if this is a date-related error.
    pub fn is_invalid_date(&self) -> bool {
        matches!(self, HarvestError::InvalidDate { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
