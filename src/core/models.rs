//! Core data models for harvested records.

use serde::{Deserialize, Serialize};

use crate::RemoteMessage;
use crate::core::sanitize::sanitize;
use crate::error::Result;

/// Content type tag written to the `Type` column.
pub const TEXT_KIND: &str = "text";

/// One reply as seen during traversal.
///
/// Only `text` is persisted (through [`ReplyRecord`]). The other fields are
/// computed so they can be logged, and so a future output shape can pick them
/// up without touching the traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Reply text with single quotes turned into double quotes.
    pub text: String,
    /// Whether the reply carries an attachment.
    pub has_media: bool,
    /// Reactions rendered as `"<emoji> <count> "` pairs.
    pub reactions: String,
    /// Send time as `YYYY-MM-DD HH:MM:SS`, empty when unknown.
    pub date: String,
}

impl Reply {
    /// Extracts the reply fields from a remote message.
    pub fn from_remote(msg: &RemoteMessage) -> Self {
        Self {
            text: msg.text.as_deref().unwrap_or_default().replace('\'', "\""),
            has_media: msg.has_media,
            reactions: msg.reaction_summary(),
            date: msg.formatted_date(),
        }
    }
}

/// Persisted shape of a reply inside the `Comment` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRecord {
    #[serde(rename = "Comment Content")]
    pub content: String,
}

impl From<&Reply> for ReplyRecord {
    fn from(reply: &Reply) -> Self {
        Self {
            content: reply.text.clone(),
        }
    }
}

/// One collected post, as written to a snapshot row.
///
/// | Column | Field | Content |
/// |--------|-------|---------|
/// | `Type` | `kind` | always `"text"` |
/// | `Content` | `content` | sanitized message text |
/// | `Comment` | `comments` | sanitized JSON array of [`ReplyRecord`] |
///
/// Replies are flattened into one text blob so the dataset stays a flat table.
///
/// The `Comment` JSON is compact and keeps non-ASCII text as raw UTF-8:
/// `[{"Comment Content":"Привет"}]`. It does not use `": "` separators or
/// `\uXXXX` escapes, so consumers comparing bytes against other exports must
/// parse the JSON rather than match strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Content")]
    pub content: String,
    #[serde(rename = "Comment")]
    pub comments: String,
}

impl MessageRecord {
    /// Builds a record from raw text and the replies gathered for it.
    ///
    /// Both the text and the serialized reply list are sanitized.
    pub fn new(text: &str, replies: &[Reply]) -> Result<Self> {
        let shaped: Vec<ReplyRecord> = replies.iter().map(ReplyRecord::from).collect();
        let serialized = serde_json::to_string(&shaped)?;

        Ok(Self {
            kind: TEXT_KIND.to_string(),
            content: sanitize(text),
            comments: sanitize(&serialized),
        })
    }

    /// Column names in output order.
    pub fn columns() -> [&'static str; 3] {
        ["Type", "Content", "Comment"]
    }

    /// Cell values in output order.
    pub fn cells(&self) -> [&str; 3] {
        [&self.kind, &self.content, &self.comments]
    }

    /// Parses the `Comment` column back into reply records.
    pub fn reply_records(&self) -> Result<Vec<ReplyRecord>> {
        Ok(serde_json::from_str(&self.comments)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Reaction;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_reply_from_remote() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let msg = RemoteMessage::new(3)
            .with_text("it's fine")
            .with_date(ts)
            .with_media(true)
            .with_reaction(Reaction::new("👍", 4));

        let reply = Reply::from_remote(&msg);
        assert_eq!(reply.text, "it\"s fine");
        assert!(reply.has_media);
        assert_eq!(reply.reactions, "👍 4 ");
        assert_eq!(reply.date, "2024-03-01 08:00:00");
    }

    #[test]
    fn test_reply_without_text() {
        let reply = Reply::from_remote(&RemoteMessage::new(1));
        assert_eq!(reply.text, "");
    }

    #[test]
    fn test_record_serializes_only_reply_text() {
        let reply = Reply {
            text: "first".into(),
            has_media: true,
            reactions: "🔥 1 ".into(),
            date: "2024-01-01 00:00:00".into(),
        };
        let record = MessageRecord::new("post", &[reply]).unwrap();

        assert_eq!(record.kind, "text");
        assert_eq!(record.content, "post");
        assert_eq!(record.comments, r#"[{"Comment Content":"first"}]"#);
        assert!(!record.comments.contains("🔥"));
    }

    #[test]
    fn test_comment_json_is_compact_utf8() {
        let reply = Reply::from_remote(&RemoteMessage::new(1).with_text("Привет"));
        let record = MessageRecord::new("post", &[reply]).unwrap();
        assert_eq!(record.comments, r#"[{"Comment Content":"Привет"}]"#);
    }

    #[test]
    fn test_record_without_replies() {
        let record = MessageRecord::new("lonely", &[]).unwrap();
        assert_eq!(record.comments, "[]");
        assert!(record.reply_records().unwrap().is_empty());
    }

    #[test]
    fn test_record_sanitizes_fields() {
        let reply = Reply {
            text: "bad\u{1}reply".into(),
            has_media: false,
            reactions: String::new(),
            date: String::new(),
        };
        let record = MessageRecord::new("bad\u{0}post", &[reply]).unwrap();
        assert_eq!(record.content, "badpost");
        // serde_json escapes control characters, so the blob is clean already
        assert_eq!(record.reply_records().unwrap()[0].content, "bad\u{1}reply");
    }

    #[test]
    fn test_columns_and_cells() {
        let record = MessageRecord::new("a", &[]).unwrap();
        assert_eq!(MessageRecord::columns(), ["Type", "Content", "Comment"]);
        assert_eq!(record.cells(), ["text", "a", "[]"]);
    }
}
