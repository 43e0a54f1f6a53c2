//! Progress estimation for a running harvest.
//!
//! Nothing here affects control flow. The harvester computes a
//! [`ProgressEstimate`] after every accepted record, logs it, and hands a
//! [`ProgressUpdate`] to an optional [`ProgressCallback`].
//!
//! # Estimation
//!
//! The total amount of work is unknown up front. The only hint a channel gives
//! is the id of the message being processed: ids grow over a channel's life,
//! so `accepted / (accepted + id)` is a rough completion fraction. When that
//! denominator would exceed the quota, the quota is the better bound and the
//! fraction becomes `accepted / quota`. The remaining time is a linear
//! extrapolation of the elapsed time.
//!
//! # Example
//!
//! ```rust
//! use chatharvest::progress::{ProgressEstimate, format_duration};
//! use std::time::Duration;
//!
//! let est = ProgressEstimate::compute(10, 990, Duration::from_secs(60), 100_000);
//! assert_eq!(est.percentage(), Some(1.0));
//! assert_eq!(format_duration(Duration::from_secs(90_061)), "01:01:01:01");
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Snapshot of how far a run has come.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEstimate {
    /// Completion fraction in `0.0..=1.0`; `None` when it cannot be computed.
    pub fraction: Option<f64>,
    /// Time since the run started.
    pub elapsed: Duration,
    /// Extrapolated time left; `None` when unknown.
    pub remaining: Option<Duration>,
}

impl ProgressEstimate {
    /// Estimates progress from the accepted count, a denominator hint, the
    /// elapsed time and the quota.
    pub fn compute(accepted: u64, hint: u64, elapsed: Duration, quota: u64) -> Self {
        let projected = accepted.saturating_add(hint);
        let denominator = if projected <= quota { projected } else { quota };

        let fraction = (denominator > 0)
            .then(|| (accepted as f64 / denominator as f64).min(1.0))
            .filter(|f| *f > 0.0);

        let remaining = fraction.and_then(|f| {
            let secs = elapsed.as_secs_f64() * (1.0 / f - 1.0);
            Duration::try_from_secs_f64(secs).ok()
        });

        Self {
            fraction,
            elapsed,
            remaining,
        }
    }

    /// Completion as a percentage (0.0 - 100.0).
    pub fn percentage(&self) -> Option<f64> {
        self.fraction.map(|f| f * 100.0)
    }
}

impl fmt::Display for ProgressEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.percentage() {
            Some(pct) => write!(f, "Progress: {:.2}%", pct)?,
            None => write!(f, "Progress: unknown")?,
        }
        write!(f, " | Elapsed Time: {}", format_duration(self.elapsed))?;
        match self.remaining {
            Some(rem) => write!(f, " | Remaining Time: {}", format_duration(rem)),
            None => write!(f, " | Remaining Time: unknown"),
        }
    }
}

/// Formats a duration as zero-padded `DD:HH:MM:SS`.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

/// Everything known about the run right after a record was accepted.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    /// Channel being scanned.
    pub channel: String,
    /// Records accepted from this channel so far.
    pub channel_count: u64,
    /// Records accepted in the whole run so far.
    pub total_count: u64,
    /// Id of the message just accepted.
    pub message_id: u64,
    /// Its send time, `YYYY-MM-DD HH:MM:SS`.
    pub message_date: String,
    /// Time estimate.
    pub estimate: ProgressEstimate,
}

/// Callback type for receiving progress updates.
///
/// # Example
///
/// ```rust
/// use chatharvest::progress::ProgressCallback;
/// use std::sync::Arc;
///
/// let callback: ProgressCallback = Arc::new(|update| {
///     println!("{} records so far", update.total_count);
/// });
/// ```
pub type ProgressCallback = Arc<dyn Fn(&ProgressUpdate) + Send + Sync>;

/// Creates a no-op progress callback.
pub fn no_progress() -> ProgressCallback {
    Arc::new(|_| {})
}
