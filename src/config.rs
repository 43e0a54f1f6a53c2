//! Run configuration.
//!
//! This module provides [`RunConfig`], the validated parameter set for one
//! harvest run, without any CLI framework dependencies. The CLI builds one
//! from its arguments; library users build one directly.
//!
//! # Example
//!
//! ```rust
//! use chatharvest::config::{RunConfig, parse_channels};
//! use chatharvest::core::filter::{DateWindow, HarvestFilter};
//! use chatharvest::format::OutputFormat;
//! use std::time::Duration;
//!
//! # fn main() -> chatharvest::Result<()> {
//! let window = DateWindow::from_dates("2024-01-01", "2024-01-31")?;
//! let config = RunConfig::new(parse_channels("@news, @sports"), HarvestFilter::new(window))
//!     .with_max_messages(5_000)
//!     .with_time_limit(Duration::from_secs(3_600))
//!     .with_format(OutputFormat::Parquet)
//!     .with_file_name("january");
//!
//! config.validate()?;
//! # Ok(())
//! # }
//! ```

use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::filter::HarvestFilter;
use crate::error::{HarvestError, Result};
use crate::format::OutputFormat;

/// Accepted message quota.
pub const MAX_MESSAGES_RANGE: RangeInclusive<u64> = 1..=100_000_000;

/// Accepted time budget, in seconds.
pub const TIME_LIMIT_RANGE: RangeInclusive<u64> = 1..=86_400;

/// Records between two checkpoints.
pub const DEFAULT_CHECKPOINT_INTERVAL: u64 = 1_000;

/// Minimum wall-clock time spent per channel.
pub const DEFAULT_MIN_CHANNEL_DURATION: Duration = Duration::from_secs(60);

/// Parameters for one harvest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Channels to scan, in order. Duplicates are scanned twice.
    pub channels: Vec<String>,

    /// Date window and keyword.
    pub filter: HarvestFilter,

    /// Stop once this many records are collected (default: 100 000 000)
    pub max_messages: u64,

    /// Wall-clock budget for the whole run (default: 24h)
    pub time_limit: Duration,

    /// Base name embedded in every output file (default: "harvest")
    pub file_name: String,

    /// Snapshot format (default: Excel)
    pub format: OutputFormat,

    /// Directory snapshots are written to (default: ".")
    pub output_dir: PathBuf,

    /// Records between checkpoints (default: 1000)
    pub checkpoint_interval: u64,

    /// Minimum time per channel; shorter channels are padded with a sleep
    /// (default: 60s)
    pub min_channel_duration: Duration,
}

impl RunConfig {
    /// Creates a configuration with default limits.
    pub fn new(channels: Vec<String>, filter: HarvestFilter) -> Self {
        Self {
            channels,
            filter,
            max_messages: *MAX_MESSAGES_RANGE.end(),
            time_limit: Duration::from_secs(*TIME_LIMIT_RANGE.end()),
            file_name: "harvest".to_string(),
            format: OutputFormat::default(),
            output_dir: PathBuf::from("."),
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
            min_channel_duration: DEFAULT_MIN_CHANNEL_DURATION,
        }
    }

    #[must_use]
    pub fn with_max_messages(mut self, max: u64) -> Self {
        self.max_messages = max;
        self
    }

    #[must_use]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    #[must_use]
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_checkpoint_interval(mut self, interval: u64) -> Self {
        self.checkpoint_interval = interval;
        self
    }

    #[must_use]
    pub fn with_min_channel_duration(mut self, duration: Duration) -> Self {
        self.min_channel_duration = duration;
        self
    }

    /// Checks every bound the run relies on.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.channels.is_empty() {
            return Err(HarvestError::invalid_config(
                "channels",
                "at least one channel is required",
            ));
        }
        let window = &self.filter.window;
        if window.min > window.max {
            return Err(HarvestError::invalid_config(
                "date_min",
                format!("{} is after date_max {}", window.min, window.max),
            ));
        }
        if !MAX_MESSAGES_RANGE.contains(&self.max_messages) {
            return Err(HarvestError::invalid_config(
                "max_messages",
                format!(
                    "{} is outside {}..={}",
                    self.max_messages,
                    MAX_MESSAGES_RANGE.start(),
                    MAX_MESSAGES_RANGE.end()
                ),
            ));
        }
        let secs = self.time_limit.as_secs();
        if self.time_limit.subsec_nanos() != 0 || !TIME_LIMIT_RANGE.contains(&secs) {
            return Err(HarvestError::invalid_config(
                "time_limit",
                format!(
                    "{:?} is not a whole number of seconds in {}..={}",
                    self.time_limit,
                    TIME_LIMIT_RANGE.start(),
                    TIME_LIMIT_RANGE.end()
                ),
            ));
        }
        if self.file_name.trim().is_empty() {
            return Err(HarvestError::invalid_config("file_name", "must not be empty"));
        }
        if self
            .file_name
            .chars()
            .any(|c| matches!(c, '/' | '\\') || c.is_control())
        {
            return Err(HarvestError::invalid_config(
                "file_name",
                format!("'{}' contains a path separator or control character", self.file_name),
            ));
        }
        if self.checkpoint_interval == 0 {
            return Err(HarvestError::invalid_config(
                "checkpoint_interval",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Splits a comma-separated channel list.
///
/// Entries are trimmed and empty entries dropped; order and duplicates are kept.
///
/// ```rust
/// use chatharvest::config::parse_channels;
///
/// assert_eq!(parse_channels(" a, ,b,a "), vec!["a", "b", "a"]);
/// ```
pub fn parse_channels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::DateWindow;

    fn config() -> RunConfig {
        let window = DateWindow::from_dates("2024-01-01", "2024-01-31").unwrap();
        RunConfig::new(vec!["a".into()], HarvestFilter::new(window))
    }

    #[test]
    fn test_defaults() {
        let c = config();
        assert_eq!(c.max_messages, 100_000_000);
        assert_eq!(c.time_limit, Duration::from_secs(86_400));
        assert_eq!(c.checkpoint_interval, 1_000);
        assert_eq!(c.min_channel_duration, Duration::from_secs(60));
        assert_eq!(c.format, OutputFormat::Excel);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let c = config()
            .with_max_messages(3)
            .with_time_limit(Duration::from_secs(10))
            .with_file_name("run")
            .with_format(OutputFormat::Parquet)
            .with_output_dir("/tmp")
            .with_checkpoint_interval(5)
            .with_min_channel_duration(Duration::ZERO);

        assert_eq!(c.max_messages, 3);
        assert_eq!(c.file_name, "run");
        assert_eq!(c.output_dir, PathBuf::from("/tmp"));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_validate_bounds() {
        assert!(config().with_max_messages(0).validate().is_err());
        assert!(config().with_max_messages(100_000_001).validate().is_err());
        assert!(config().with_max_messages(100_000_000).validate().is_ok());
        assert!(config().with_time_limit(Duration::ZERO).validate().is_err());
        assert!(config().with_time_limit(Duration::from_secs(86_401)).validate().is_err());
        assert!(config().with_time_limit(Duration::from_millis(1_500)).validate().is_err());
        assert!(config().with_checkpoint_interval(0).validate().is_err());
    }

    #[test]
    fn test_validate_names() {
        assert!(config().with_file_name("  ").validate().is_err());
        assert!(config().with_file_name("a/b").validate().is_err());

        let mut c = config();
        c.channels.clear();
        let err = c.validate().unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_validate_rejects_inverted_window() {
        let mut c = config();
        std::mem::swap(&mut c.filter.window.min, &mut c.filter.window.max);

        let err = c.validate().unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("date_min"));
    }

    #[test]
    fn test_deserialized_inverted_window_rejected() {
        let json = serde_json::json!({
            "channels": ["@a"],
            "filter": {
                "window": {"min": "2024-02-01T00:00:00Z", "max": "2024-01-01T00:00:00Z"},
                "keyword": ""
            },
            "max_messages": 10,
            "time_limit": {"secs": 60, "nanos": 0},
            "file_name": "run",
            "format": "parquet",
            "output_dir": ".",
            "checkpoint_interval": 1000,
            "min_channel_duration": {"secs": 60, "nanos": 0}
        });
        let c: RunConfig = serde_json::from_value(json).unwrap();

        assert!(c.validate().unwrap_err().is_config());
    }

    #[test]
    fn test_parse_channels() {
        assert_eq!(parse_channels("@a,@b"), vec!["@a", "@b"]);
        assert_eq!(parse_channels(" @a , , @a "), vec!["@a", "@a"]);
        assert!(parse_channels(" , ").is_empty());
    }
}
