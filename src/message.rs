//! Messages as served by a remote source.
//!
//! [`RemoteMessage`] is the normalized shape every
//! [`MessageSource`](crate::source::MessageSource) yields, for channel posts
//! and replies alike. It carries more than ends up in the dataset: media and
//! reactions are read during traversal and show up in logs and in
//! [`Reply`](crate::core::models::Reply), but not in the persisted columns.
//!
//! # Examples
//!
//! ```
//! use chatharvest::{Reaction, RemoteMessage};
//! use chrono::{TimeZone, Utc};
//!
//! let msg = RemoteMessage::new(42)
//!     .with_date(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap())
//!     .with_text("Hello, channel!")
//!     .with_reaction(Reaction::new("👍", 12));
//!
//! assert_eq!(msg.id, 42);
//! assert_eq!(msg.reaction_summary(), "👍 12 ");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One reaction bucket: an emoji token and how many users picked it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    /// Emoji token as displayed by the platform.
    pub emoji: String,
    /// Number of users who reacted with it.
    pub count: u64,
}

impl Reaction {
    pub fn new(emoji: impl Into<String>, count: u64) -> Self {
        Self {
            emoji: emoji.into(),
            count,
        }
    }
}

/// A message from a channel stream or a reply stream.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `id` | `u64` | Platform message id, unique within the channel |
/// | `date` | `Option<DateTime<Utc>>` | Send time; `None` when the source could not provide it |
/// | `text` | `Option<String>` | Text body; `None` for service or malformed messages |
/// | `has_media` | `bool` | Whether a photo, file or other attachment is present |
/// | `reactions` | `Vec<Reaction>` | Reaction buckets in platform order |
///
/// Missing `date` or `text` is not an error at this level: the message
/// harvester decides whether such a message can be used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteMessage {
    pub id: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub has_media: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

impl RemoteMessage {
    /// Creates a message with only an id. Every other field is empty.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            date: None,
            text: None,
            has_media: false,
            reactions: Vec::new(),
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    #[must_use]
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_media(mut self, has_media: bool) -> Self {
        self.has_media = has_media;
        self
    }

    #[must_use]
    pub fn with_reaction(mut self, reaction: Reaction) -> Self {
        self.reactions.push(reaction);
        self
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    /// Renders reactions as `"<emoji> <count> "` pairs, concatenated.
    ///
    /// Returns an empty string when there are no reactions.
    pub fn reaction_summary(&self) -> String {
        let mut summary = String::new();
        for reaction in &self.reactions {
            summary.push_str(&reaction.emoji);
            summary.push(' ');
            summary.push_str(&reaction.count.to_string());
            summary.push(' ');
        }
        summary
    }

    /// Send time formatted as `YYYY-MM-DD HH:MM:SS`, or empty when unknown.
    pub fn formatted_date(&self) -> String {
        self.date
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default()
    }

    /// Returns `true` if the text contains `keyword`, ignoring case.
    ///
    /// An empty keyword matches everything, including messages without text.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        if keyword.is_empty() {
            return true;
        }
        let needle = keyword.to_lowercase();
        self.text
            .as_deref()
            .is_some_and(|t| t.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_builder() {
        let ts = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let msg = RemoteMessage::new(7)
            .with_date(ts)
            .with_text("hi")
            .with_media(true)
            .with_reaction(Reaction::new("🔥", 3));

        assert_eq!(msg.id, 7);
        assert_eq!(msg.date, Some(ts));
        assert_eq!(msg.text.as_deref(), Some("hi"));
        assert!(msg.has_media);
        assert_eq!(msg.reactions.len(), 1);
    }

    #[test]
    fn test_reaction_summary() {
        let msg = RemoteMessage::new(1)
            .with_reaction(Reaction::new("👍", 10))
            .with_reaction(Reaction::new("❤️", 2));
        assert_eq!(msg.reaction_summary(), "👍 10 ❤️ 2 ");
        assert_eq!(RemoteMessage::new(2).reaction_summary(), "");
    }

    #[test]
    fn test_formatted_date() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 5, 9, 3, 7).unwrap();
        assert_eq!(
            RemoteMessage::new(1).with_date(ts).formatted_date(),
            "2024-01-05 09:03:07"
        );
        assert_eq!(RemoteMessage::new(1).formatted_date(), "");
    }

    #[test]
    fn test_matches_keyword() {
        let msg = RemoteMessage::new(1).with_text("Breaking NEWS today");
        assert!(msg.matches_keyword("news"));
        assert!(msg.matches_keyword(""));
        assert!(!msg.matches_keyword("weather"));
        assert!(!RemoteMessage::new(2).matches_keyword("news"));
        assert!(RemoteMessage::new(2).matches_keyword(""));
    }

    #[test]
    fn test_serde_skips_empty() {
        let json = serde_json::to_string(&RemoteMessage::new(5)).unwrap();
        assert!(!json.contains("date"));
        assert!(!json.contains("reactions"));

        let parsed: RemoteMessage = serde_json::from_str(r#"{"id":9,"text":"x"}"#).unwrap();
        assert_eq!(parsed.id, 9);
        assert!(!parsed.has_media);
    }
}
