//! Date window and keyword filter for a harvest run.
//!
//! This module provides [`DateWindow`], the inclusive `[min, max]` range a
//! message must fall into, and [`HarvestFilter`], which pairs it with the
//! optional keyword passed to the source as a server-side search.
//!
//! # Window positions
//!
//! Sources serve messages newest first, so a message's position relative to
//! the window decides what the channel scan does next:
//!
//! | Position | Meaning | Scan reaction |
//! |----------|---------|---------------|
//! | [`Inside`](WindowPosition::Inside) | `min <= ts <= max` | collect |
//! | [`Before`](WindowPosition::Before) | `ts < min` | stop the channel |
//! | [`After`](WindowPosition::After) | `ts > max` | skip, keep scanning |
//!
//! # Examples
//!
//! ```
//! use chatharvest::core::filter::{DateWindow, WindowPosition};
//! use chrono::{TimeZone, Utc};
//!
//! # fn main() -> chatharvest::Result<()> {
//! let window = DateWindow::from_dates("2024-01-01", "2024-01-31")?;
//!
//! let inside = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
//! let older = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
//!
//! assert_eq!(window.position(inside), WindowPosition::Inside);
//! assert_eq!(window.position(older), WindowPosition::Before);
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HarvestError;

/// Where a timestamp falls relative to a [`DateWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPosition {
    /// Within the window, bounds included.
    Inside,
    /// Older than the window start.
    Before,
    /// Newer than the window end.
    After,
}

/// Inclusive UTC date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    /// First instant included.
    pub min: DateTime<Utc>,
    /// Last instant included.
    pub max: DateTime<Utc>,
}

impl DateWindow {
    /// Creates a window from explicit instants.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::InvalidConfig`] if `min > max`.
    pub fn new(min: DateTime<Utc>, max: DateTime<Utc>) -> Result<Self, HarvestError> {
        if min > max {
            return Err(HarvestError::invalid_config(
                "date_min",
                format!("{} is after date_max {}", min, max),
            ));
        }
        Ok(Self { min, max })
    }

    /// Creates a window from two `YYYY-MM-DD` calendar dates.
    ///
    /// The start is widened to `00:00:00.000000` and the end to
    /// `23:59:59.999999`, both in UTC, so both days are fully included.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::InvalidDate`] for a malformed date and
    /// [`HarvestError::InvalidConfig`] if the start is after the end.
    pub fn from_dates(date_min: &str, date_max: &str) -> Result<Self, HarvestError> {
        let min = parse_date_start(date_min)?;
        let max = parse_date_end(date_max)?;
        Self::new(min, max)
    }

    /// Classifies a timestamp.
    pub fn position(&self, ts: DateTime<Utc>) -> WindowPosition {
        if ts < self.min {
            WindowPosition::Before
        } else if ts > self.max {
            WindowPosition::After
        } else {
            WindowPosition::Inside
        }
    }

    /// Returns `true` if the timestamp is inside the window.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.position(ts) == WindowPosition::Inside
    }
}

/// Parse a date string in YYYY-MM-DD format to the first instant of that day.
pub fn parse_date_start(date_str: &str) -> Result<DateTime<Utc>, HarvestError> {
    let naive = parse_naive(date_str)?;
    Ok(naive.and_time(NaiveTime::MIN).and_utc())
}

/// Parse a date string in YYYY-MM-DD format to the last microsecond of that day.
pub fn parse_date_end(date_str: &str) -> Result<DateTime<Utc>, HarvestError> {
    let naive = parse_naive(date_str)?;
    let end = NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)
        .ok_or_else(|| HarvestError::invalid_date(date_str))?;
    Ok(naive.and_time(end).and_utc())
}

fn parse_naive(date_str: &str) -> Result<NaiveDate, HarvestError> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
        .map_err(|_| HarvestError::invalid_date(date_str))
}

/// Everything that decides whether a message is collected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestFilter {
    /// Inclusive date range.
    pub window: DateWindow,
    /// Search keyword. Empty means no search.
    #[serde(default)]
    pub keyword: String,
}

impl HarvestFilter {
    pub fn new(window: DateWindow) -> Self {
        Self {
            window,
            keyword: String::new(),
        }
    }

    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    /// Keyword to hand to the source, or `None` for an unfiltered stream.
    pub fn search(&self) -> Option<&str> {
        let trimmed = self.keyword.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn window() -> DateWindow {
        DateWindow::from_dates("2024-01-01", "2024-01-31").unwrap()
    }

    #[test]
    fn test_bounds_are_widened() {
        let w = window();
        assert_eq!(w.min, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(w.max.date_naive().to_string(), "2024-01-31");
        assert_eq!(w.max.hour(), 23);
        assert_eq!(w.max.nanosecond(), 999_999_000);
    }

    #[test]
    fn test_position_inclusive_bounds() {
        let w = window();
        assert_eq!(w.position(w.min), WindowPosition::Inside);
        assert_eq!(w.position(w.max), WindowPosition::Inside);
        assert_eq!(
            w.position(w.min - chrono::Duration::microseconds(1)),
            WindowPosition::Before
        );
        assert_eq!(
            w.position(w.max + chrono::Duration::microseconds(1)),
            WindowPosition::After
        );
    }

    #[test]
    fn test_single_day_window() {
        let w = DateWindow::from_dates("2024-06-15", "2024-06-15").unwrap();
        assert!(w.contains(Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()));
        assert!(!w.contains(Utc.with_ymd_and_hms(2024, 6, 16, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_invalid_date_format() {
        let result = DateWindow::from_dates("01-01-2024", "2024-01-31");
        assert!(matches!(result, Err(HarvestError::InvalidDate { .. })));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let result = DateWindow::from_dates("2024-02-01", "2024-01-31");
        assert!(matches!(result, Err(HarvestError::InvalidConfig { .. })));
    }

    #[test]
    fn test_search_keyword() {
        let f = HarvestFilter::new(window());
        assert_eq!(f.search(), None);
        assert_eq!(f.clone().with_keyword("   ").search(), None);
        assert_eq!(f.with_keyword(" election ").search(), Some("election"));
    }
}
