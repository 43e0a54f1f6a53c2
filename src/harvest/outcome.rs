//! Explicit results of each traversal level.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::models::MessageRecord;

/// Why a message was not collected even though its stream was fine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The source gave no send time.
    MissingDate,
    /// In-window message without text.
    MissingText,
    /// The record could not be built.
    Encode(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingDate => write!(f, "missing date"),
            SkipReason::MissingText => write!(f, "missing text"),
            SkipReason::Encode(e) => write!(f, "record encoding failed: {}", e),
        }
    }
}

/// What happened to one message of a channel stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Collected into the record list.
    Accepted,
    /// Newer than the window; the scan goes on.
    TooNew,
    /// Older than the window; nothing further down the stream can match.
    TooOld,
    /// Unusable message; the scan goes on.
    Skipped(SkipReason),
}

/// How the scan of one channel ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEnd {
    /// The run-wide quota was hit.
    QuotaReached,
    /// The run-wide time budget ran out.
    TimeBudgetExceeded,
    /// The stream had no more messages.
    StreamExhausted,
    /// A message older than the window was seen.
    DateBoundaryReached,
    /// Opening or reading the stream failed.
    Failed(String),
}

impl ChannelEnd {
    pub fn is_failure(&self) -> bool {
        matches!(self, ChannelEnd::Failed(_))
    }
}

impl fmt::Display for ChannelEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelEnd::QuotaReached => write!(f, "quota reached"),
            ChannelEnd::TimeBudgetExceeded => write!(f, "time budget exceeded"),
            ChannelEnd::StreamExhausted => write!(f, "stream exhausted"),
            ChannelEnd::DateBoundaryReached => write!(f, "date boundary reached"),
            ChannelEnd::Failed(e) => write!(f, "failed: {}", e),
        }
    }
}

/// Summary of one attempted channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelOutcome {
    pub channel: String,
    /// Records collected from this channel.
    pub records: u64,
    pub end: ChannelEnd,
    /// Time spent scanning, excluding the rate-limit pause.
    pub elapsed: Duration,
}

/// Why the run stopped visiting channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every channel was attempted.
    Completed,
    QuotaReached,
    TimeBudgetExceeded,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Completed => write!(f, "all channels visited"),
            StopReason::QuotaReached => write!(f, "message quota reached"),
            StopReason::TimeBudgetExceeded => write!(f, "time budget exceeded"),
        }
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct HarvestReport {
    /// Path of the final snapshot.
    pub output: PathBuf,
    /// Collected records, in output order.
    pub records: Vec<MessageRecord>,
    /// Attempted channels, in order.
    pub channels: Vec<ChannelOutcome>,
    /// Channels never opened because the run stopped first.
    pub not_attempted: Vec<String>,
    pub stop: StopReason,
    /// Checkpoint files written, in order.
    pub checkpoints: Vec<PathBuf>,
    pub elapsed: Duration,
}

impl HarvestReport {
    pub fn total(&self) -> u64 {
        self.records.len() as u64
    }

    pub fn failed_channels(&self) -> impl Iterator<Item = &ChannelOutcome> {
        self.channels.iter().filter(|c| c.end.is_failure())
    }
}
