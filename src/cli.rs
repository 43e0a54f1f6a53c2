//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure
//! - [`OutputFormat`] - clap-facing mirror of [`crate::format::OutputFormat`]
//!
//! [`Args::into_config`] validates everything the run depends on, so a bad
//! date or an out-of-range limit is reported before any channel is opened.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{RunConfig, parse_channels};
use crate::core::filter::{DateWindow, HarvestFilter};
use crate::error::Result;

/// Collect channel posts and their comment threads within a date window
/// into an Excel or Parquet dataset, with periodic checkpoints.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatharvest")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatharvest -c @news,@sports --from 2024-01-01 --to 2024-01-31
    chatharvest -c @news --from 2024-01-01 --to 2024-12-31 -s election -f parquet
    chatharvest -c @news --from 2024-01-01 --to 2024-01-31 -n 500 -t 600 --name jan")]
pub struct Args {
    /// Comma-separated channel list
    #[arg(short, long, value_name = "CHANNELS")]
    pub channels: String,

    /// First day included (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: String,

    /// Last day included (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to: String,

    /// Only collect posts containing this keyword
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Stop after this many posts
    #[arg(short = 'n', long, default_value_t = 100_000_000)]
    pub max_messages: u64,

    /// Stop after this many seconds
    #[arg(short = 't', long, default_value_t = 86_400)]
    pub time_limit: u64,

    /// Output format
    #[arg(short, long, value_enum, default_value = "excel")]
    pub format: OutputFormat,

    /// Base name for output files
    #[arg(long, default_value = "harvest")]
    pub name: String,

    /// Directory for output files
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Directory holding Telegram Desktop JSON exports
    #[arg(short, long, default_value = "exports")]
    pub exports: PathBuf,

    /// Minimum seconds spent per channel
    #[arg(long, default_value_t = 60)]
    pub min_channel_secs: u64,

    /// Posts between checkpoint files
    #[arg(long, default_value_t = 1_000)]
    pub checkpoint_every: u64,

    /// Also append logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Builds and validates the run configuration.
    pub fn into_config(self) -> Result<RunConfig> {
        let window = DateWindow::from_dates(&self.from, &self.to)?;
        let filter = HarvestFilter::new(window).with_keyword(self.search);

        let config = RunConfig::new(parse_channels(&self.channels), filter)
            .with_max_messages(self.max_messages)
            .with_time_limit(Duration::from_secs(self.time_limit))
            .with_format(self.format.into())
            .with_file_name(self.name)
            .with_output_dir(self.output_dir)
            .with_checkpoint_interval(self.checkpoint_every)
            .with_min_channel_duration(Duration::from_secs(self.min_channel_secs));

        config.validate()?;
        Ok(config)
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Excel workbook (.xlsx)
    #[default]
    #[value(alias = "xlsx")]
    Excel,

    /// Apache Parquet (.parquet)
    Parquet,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::format::OutputFormat::from(*self))
    }
}

// Conversion to library format type
impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> crate::format::OutputFormat {
        match format {
            OutputFormat::Excel => crate::format::OutputFormat::Excel,
            OutputFormat::Parquet => crate::format::OutputFormat::Parquet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> std::result::Result<Args, clap::Error> {
        let mut argv = vec![
            "chatharvest",
            "--channels",
            "@a, @b",
            "--from",
            "2024-01-01",
            "--to",
            "2024-01-31",
        ];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv)
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.format, OutputFormat::Excel);
        assert_eq!(args.max_messages, 100_000_000);
        assert_eq!(args.time_limit, 86_400);
        assert_eq!(args.min_channel_secs, 60);

        let config = args.into_config().unwrap();
        assert_eq!(config.channels, vec!["@a", "@b"]);
        assert_eq!(config.filter.search(), None);
        assert_eq!(config.checkpoint_interval, 1_000);
    }

    #[test]
    fn test_full_args() {
        let args = parse(&[
            "-s", "vote", "-n", "10", "-t", "30", "-f", "parquet", "--name", "run",
            "--min-channel-secs", "0", "--checkpoint-every", "5",
        ])
        .unwrap();
        let config = args.into_config().unwrap();

        assert_eq!(config.filter.search(), Some("vote"));
        assert_eq!(config.max_messages, 10);
        assert_eq!(config.time_limit, Duration::from_secs(30));
        assert_eq!(config.format, crate::format::OutputFormat::Parquet);
        assert_eq!(config.file_name, "run");
        assert_eq!(config.min_channel_duration, Duration::ZERO);
    }

    #[test]
    fn test_xlsx_alias() {
        assert_eq!(parse(&["-f", "xlsx"]).unwrap().format, OutputFormat::Excel);
        assert!(parse(&["-f", "csv"]).is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(parse(&["-n", "0"]).unwrap().into_config().is_err());
        assert!(parse(&["-t", "86401"]).unwrap().into_config().is_err());

        let args = Args::try_parse_from([
            "chatharvest", "-c", "@a", "--from", "2024-13-01", "--to", "2024-01-31",
        ])
        .unwrap();
        assert!(args.into_config().unwrap_err().is_invalid_date());
    }

    #[test]
    fn test_empty_channel_list_rejected() {
        let args = Args::try_parse_from([
            "chatharvest", "-c", " , ", "--from", "2024-01-01", "--to", "2024-01-31",
        ])
        .unwrap();
        assert!(args.into_config().unwrap_err().is_config());
    }
}
