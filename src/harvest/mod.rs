//! The harvesting loop.
//!
//! A [`Harvester`] walks the configured channels in order. For each channel it
//! pulls the message stream newest first, collects every in-window message
//! together with its reply thread, and stops the channel as soon as it sees a
//! message older than the window. Across channels it enforces:
//!
//! - the message quota, checked after every accepted record and before each
//!   channel
//! - the time budget, checked before each channel, when each message
//!   arrives, and after every accepted record
//! - a minimum duration per channel, padded with a sleep
//!
//! Every `checkpoint_interval` records the full record list is written to a
//! checkpoint file. The final snapshot is always written, even when empty.
//!
//! Failures are contained at the lowest level that can absorb them: a broken
//! reply stream yields no replies, an unusable message is skipped, a broken
//! channel is recorded as failed. Only a failed final write fails the run.
//!
//! # Example
//!
//! ```rust,no_run
//! use chatharvest::config::RunConfig;
//! use chatharvest::core::filter::{DateWindow, HarvestFilter};
//! use chatharvest::harvest::Harvester;
//! use chatharvest::source::MemorySource;
//!
//! # async fn example() -> chatharvest::Result<()> {
//! let window = DateWindow::from_dates("2024-01-01", "2024-01-31")?;
//! let config = RunConfig::new(vec!["@news".into()], HarvestFilter::new(window));
//!
//! let harvester = Harvester::with_file_output(MemorySource::new(), config);
//! let report = harvester.run().await?;
//! println!("{} records in {}", report.total(), report.output.display());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use tokio::time::Instant;

use crate::config::RunConfig;
use crate::core::models::MessageRecord;
use crate::core::snapshot::{FileSnapshotWriter, SnapshotKind, SnapshotWriter};
use crate::error::Result;
use crate::progress::ProgressCallback;
use crate::source::MessageSource;

mod messages;
mod outcome;
mod replies;

pub use outcome::{
    ChannelEnd, ChannelOutcome, HarvestReport, MessageOutcome, SkipReason, StopReason,
};
pub use replies::harvest_replies;

/// Record counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    /// Records accepted in the whole run.
    pub total: u64,
    /// Records accepted from the current channel.
    pub channel: u64,
}

/// Mutable state of one run, owned by [`Harvester::run`].
#[derive(Debug)]
pub struct RunState {
    pub started: Instant,
    pub records: Vec<MessageRecord>,
    pub counters: Counters,
    pub checkpoints: Vec<PathBuf>,
}

impl RunState {
    fn new() -> Self {
        Self {
            started: Instant::now(),
            records: Vec::new(),
            counters: Counters::default(),
            checkpoints: Vec::new(),
        }
    }

    fn push(&mut self, record: MessageRecord) {
        self.records.push(record);
        self.counters.total += 1;
        self.counters.channel += 1;
    }
}

/// Drives one harvest run over a [`MessageSource`].
pub struct Harvester<S, W> {
    source: S,
    writer: W,
    config: RunConfig,
    progress: Option<ProgressCallback>,
}

impl<S: MessageSource> Harvester<S, FileSnapshotWriter> {
    /// Creates a harvester writing snapshots to `config.output_dir`.
    pub fn with_file_output(source: S, config: RunConfig) -> Self {
        let writer = FileSnapshotWriter::new(
            config.output_dir.clone(),
            config.file_name.clone(),
            config.format,
        );
        Self::new(source, writer, config)
    }
}

impl<S: MessageSource, W: SnapshotWriter> Harvester<S, W> {
    pub fn new(source: S, writer: W, config: RunConfig) -> Self {
        Self {
            source,
            writer,
            config,
            progress: None,
        }
    }

    /// Sets a callback invoked after every accepted record.
    #[must_use]
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Runs the harvest to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the final snapshot
    /// cannot be written. Channel, message and reply failures are logged and
    /// reported in the [`HarvestReport`] instead.
    pub async fn run(&self) -> Result<HarvestReport> {
        self.config.validate()?;

        let mut state = RunState::new();
        let mut channels = Vec::with_capacity(self.config.channels.len());
        let mut not_attempted = Vec::new();
        let mut stop = StopReason::Completed;

        tracing::info!(
            source = self.source.name(),
            channels = self.config.channels.len(),
            quota = self.config.max_messages,
            time_limit_secs = self.config.time_limit.as_secs(),
            "harvest started"
        );

        for (idx, channel) in self.config.channels.iter().enumerate() {
            if let Some(reason) = self.stop_reason(&state) {
                stop = reason;
                not_attempted = self.config.channels[idx..].to_vec();
                tracing::info!(
                    reason = %reason,
                    remaining = not_attempted.len(),
                    "stopping before next channel"
                );
                break;
            }

            let channel_start = Instant::now();
            state.counters.channel = 0;

            let end = match self.scan_channel(channel, &mut state).await {
                Ok(end) => {
                    tracing::info!(
                        channel = channel.as_str(),
                        end = %end,
                        "{} was ok with {:05} posts",
                        channel,
                        state.counters.channel
                    );
                    end
                }
                Err(e) => {
                    tracing::error!(
                        channel = channel.as_str(),
                        records = state.counters.channel,
                        error = %e,
                        "channel failed"
                    );
                    ChannelEnd::Failed(e.to_string())
                }
            };

            let elapsed = channel_start.elapsed();
            channels.push(ChannelOutcome {
                channel: channel.clone(),
                records: state.counters.channel,
                end,
                elapsed,
            });

            if elapsed < self.config.min_channel_duration {
                let pause = self.config.min_channel_duration - elapsed;
                tracing::debug!(
                    channel = channel.as_str(),
                    pause_ms = pause.as_millis() as u64,
                    "rate limit pause"
                );
                tokio::time::sleep(pause).await;
            }
        }

        if stop == StopReason::Completed {
            stop = match channels.last().map(|c| &c.end) {
                Some(ChannelEnd::QuotaReached) => StopReason::QuotaReached,
                Some(ChannelEnd::TimeBudgetExceeded) => StopReason::TimeBudgetExceeded,
                _ => StopReason::Completed,
            };
        }

        let total = state.counters.total;
        let output = self
            .writer
            .write(&state.records, SnapshotKind::Final { total })?;

        tracing::info!(
            output = %output.display(),
            stop = %stop,
            "Concluded! {:05} posts were scraped",
            total
        );

        Ok(HarvestReport {
            output,
            records: state.records,
            channels,
            not_attempted,
            stop,
            checkpoints: state.checkpoints,
            elapsed: state.started.elapsed(),
        })
    }

    fn quota_reached(&self, state: &RunState) -> bool {
        state.counters.total >= self.config.max_messages
    }

    fn budget_exceeded(&self, state: &RunState) -> bool {
        state.started.elapsed() > self.config.time_limit
    }

    fn stop_reason(&self, state: &RunState) -> Option<StopReason> {
        if self.quota_reached(state) {
            Some(StopReason::QuotaReached)
        } else if self.budget_exceeded(state) {
            Some(StopReason::TimeBudgetExceeded)
        } else {
            None
        }
    }
}
