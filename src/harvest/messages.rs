//! Per-channel scan.

use futures::StreamExt;

use crate::RemoteMessage;
use crate::core::filter::WindowPosition;
use crate::core::models::MessageRecord;
use crate::core::snapshot::{SnapshotKind, SnapshotWriter};
use crate::error::Result;
use crate::progress::{ProgressEstimate, ProgressUpdate};
use crate::source::MessageSource;

use super::replies::harvest_replies;
use super::{ChannelEnd, Harvester, MessageOutcome, RunState, SkipReason};

impl<S: MessageSource, W: SnapshotWriter> Harvester<S, W> {
    /// Scans one channel until its stream ends or a stop condition holds.
    ///
    /// Returns `Err` only when the stream cannot be opened or breaks; the
    /// records gathered before that stay in `state`.
    pub(super) async fn scan_channel(
        &self,
        channel: &str,
        state: &mut RunState,
    ) -> Result<ChannelEnd> {
        let search = self.config.filter.search();
        tracing::info!(channel, search, "scanning channel");

        let mut stream = self.source.messages(channel, search).await?;

        while let Some(item) = stream.next().await {
            let message = item?;

            if self.budget_exceeded(state) {
                return Ok(ChannelEnd::TimeBudgetExceeded);
            }

            match self.process_message(channel, &message, state).await {
                MessageOutcome::Accepted => {
                    if self.quota_reached(state) {
                        return Ok(ChannelEnd::QuotaReached);
                    }
                    if self.budget_exceeded(state) {
                        return Ok(ChannelEnd::TimeBudgetExceeded);
                    }
                }
                MessageOutcome::TooOld => {
                    tracing::debug!(channel, message_id = message.id, "reached window start");
                    return Ok(ChannelEnd::DateBoundaryReached);
                }
                MessageOutcome::TooNew => {
                    tracing::trace!(channel, message_id = message.id, "newer than window");
                }
                MessageOutcome::Skipped(reason) => {
                    tracing::warn!(
                        channel,
                        message_id = message.id,
                        reason = %reason,
                        "message skipped"
                    );
                }
            }
        }

        Ok(ChannelEnd::StreamExhausted)
    }

    async fn process_message(
        &self,
        channel: &str,
        message: &RemoteMessage,
        state: &mut RunState,
    ) -> MessageOutcome {
        let Some(date) = message.date else {
            return MessageOutcome::Skipped(SkipReason::MissingDate);
        };

        match self.config.filter.window.position(date) {
            WindowPosition::Before => return MessageOutcome::TooOld,
            WindowPosition::After => return MessageOutcome::TooNew,
            WindowPosition::Inside => {}
        }

        let Some(text) = message.text.as_deref() else {
            return MessageOutcome::Skipped(SkipReason::MissingText);
        };

        let replies = harvest_replies(&self.source, channel, message.id).await;
        let record = match MessageRecord::new(text, &replies) {
            Ok(record) => record,
            Err(e) => return MessageOutcome::Skipped(SkipReason::Encode(e.to_string())),
        };

        state.push(record);
        self.report_progress(channel, message, state);

        let total = state.counters.total;
        if total % self.config.checkpoint_interval == 0 {
            let kind = SnapshotKind::Checkpoint {
                total,
                channel,
                message_id: message.id,
            };
            match self.writer.write(&state.records, kind) {
                Ok(path) => state.checkpoints.push(path),
                Err(e) => {
                    tracing::error!(channel, total, error = %e, "checkpoint failed, continuing");
                }
            }
        }

        MessageOutcome::Accepted
    }

    fn report_progress(&self, channel: &str, message: &RemoteMessage, state: &RunState) {
        let estimate = ProgressEstimate::compute(
            state.counters.total,
            message.id,
            state.started.elapsed(),
            self.config.max_messages,
        );
        let message_date = message.formatted_date();

        tracing::info!(
            channel,
            channel_count = state.counters.channel,
            total = state.counters.total,
            message_id = message.id,
            date = %message_date,
            "{}",
            estimate
        );

        if let Some(callback) = &self.progress {
            callback(&ProgressUpdate {
                channel: channel.to_string(),
                channel_count: state.counters.channel,
                total_count: state.counters.total,
                message_id: message.id,
                message_date,
                estimate,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use crate::core::filter::{DateWindow, HarvestFilter};
    use crate::core::snapshot::FileSnapshotWriter;
    use crate::format::OutputFormat;
    use crate::source::MemorySource;
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    fn at(day: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).unwrap()
    }

    fn harvester(source: MemorySource) -> Harvester<MemorySource, FileSnapshotWriter> {
        let window = DateWindow::from_dates("2024-01-10", "2024-01-20").unwrap();
        let config = RunConfig::new(vec!["a".into()], HarvestFilter::new(window))
            .with_min_channel_duration(Duration::ZERO);
        let writer = FileSnapshotWriter::new("/nonexistent", "t", OutputFormat::Parquet);
        Harvester::new(source, writer, config)
    }

    #[tokio::test]
    async fn test_too_new_is_skipped_and_scan_continues() {
        let source = MemorySource::new().with_channel(
            "a",
            vec![
                RemoteMessage::new(3).with_date(at(25)).with_text("new"),
                RemoteMessage::new(2).with_date(at(15)).with_text("in"),
            ],
        );
        let h = harvester(source);
        let mut state = RunState::new();

        let end = h.scan_channel("a", &mut state).await.unwrap();
        assert_eq!(end, ChannelEnd::StreamExhausted);
        assert_eq!(state.records.len(), 1);
        assert_eq!(state.records[0].content, "in");
    }

    #[tokio::test]
    async fn test_missing_fields_skip() {
        let source = MemorySource::new().with_channel(
            "a",
            vec![
                RemoteMessage::new(4).with_text("no date"),
                RemoteMessage::new(3).with_date(at(15)),
                RemoteMessage::new(2).with_date(at(14)).with_text("kept"),
            ],
        );
        let h = harvester(source);
        let mut state = RunState::new();

        h.scan_channel("a", &mut state).await.unwrap();
        assert_eq!(state.counters.total, 1);
        assert_eq!(state.records[0].content, "kept");
    }

    #[tokio::test]
    async fn test_missing_text_outside_window_is_not_a_skip() {
        let source = MemorySource::new()
            .with_channel("a", vec![RemoteMessage::new(1).with_date(at(2))]);
        let h = harvester(source);
        let mut state = RunState::new();

        let end = h.scan_channel("a", &mut state).await.unwrap();
        assert_eq!(end, ChannelEnd::DateBoundaryReached);
    }

    #[tokio::test]
    async fn test_stream_error_keeps_earlier_records() {
        let source = MemorySource::new()
            .with_channel(
                "a",
                vec![
                    RemoteMessage::new(3).with_date(at(15)).with_text("one"),
                    RemoteMessage::new(2).with_date(at(14)).with_text("two"),
                ],
            )
            .with_stream_error("a", 1, "reset");
        let h = harvester(source);
        let mut state = RunState::new();

        assert!(h.scan_channel("a", &mut state).await.is_err());
        assert_eq!(state.records.len(), 1);
    }

    #[tokio::test]
    async fn test_checkpoint_failure_does_not_stop_scan() {
        let posts = (1..=3)
            .rev()
            .map(|id| RemoteMessage::new(id).with_date(at(15)).with_text("x"))
            .collect();
        let source = MemorySource::new().with_channel("a", posts);
        let mut h = harvester(source);
        h.config.checkpoint_interval = 1;
        let mut state = RunState::new();

        let end = h.scan_channel("a", &mut state).await.unwrap();
        assert_eq!(end, ChannelEnd::StreamExhausted);
        assert_eq!(state.counters.total, 3);
        assert!(state.checkpoints.is_empty());
    }

    #[tokio::test]
    async fn test_progress_callback() {
        use std::sync::{Arc, Mutex};

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let source = MemorySource::new().with_channel(
            "a",
            vec![RemoteMessage::new(7).with_date(at(15)).with_text("x")],
        );
        let h = harvester(source).with_progress(Arc::new(move |u: &ProgressUpdate| {
            sink.lock().unwrap().push((u.message_id, u.total_count, u.message_date.clone()));
        }));
        let mut state = RunState::new();

        h.scan_channel("a", &mut state).await.unwrap();
        assert_eq!(
            *seen.lock().unwrap(),
            vec![(7, 1, "2024-01-15 09:00:00".to_string())]
        );
    }
}
