//! Telegram Desktop export source.
//!
//! Reads the `result.json` files Telegram Desktop writes with "Export chat
//! history" (JSON format) and serves them through [`MessageSource`].
//!
//! # Layout
//!
//! A channel identifier resolves inside the export root to the first of:
//!
//! 1. `<root>/<name>.json`
//! 2. `<root>/<name>/result.json`
//!
//! where `<name>` is the identifier without a `@` prefix or `t.me/` link.
//!
//! # Threads
//!
//! Messages whose `reply_to_message_id` is set are replies and are served only
//! through [`replies`](MessageSource::replies), in export (chronological)
//! order. Every other `message` entry is a post, served newest first.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use serde::Deserialize;
use serde_json::Value;
use tokio::fs;
use tokio::sync::Mutex;

use crate::error::{HarvestError, Result};
use crate::message::{Reaction, RemoteMessage};

use super::{MessageSource, MessageStream};

/// Raw Telegram message structure for deserialization.
#[derive(Debug, Deserialize)]
struct RawMessage {
    id: Option<u64>,
    #[serde(rename = "type")]
    msg_type: String,
    /// Unix timestamp as string
    date_unixtime: Option<String>,
    /// Message text (can be string or array)
    text: Option<Value>,
    reply_to_message_id: Option<u64>,
    photo: Option<String>,
    file: Option<String>,
    media_type: Option<String>,
    #[serde(default)]
    reactions: Vec<RawReaction>,
}

#[derive(Debug, Deserialize)]
struct RawReaction {
    #[serde(default)]
    count: u64,
    emoji: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawExport {
    messages: Vec<RawMessage>,
}

/// One loaded channel export.
#[derive(Debug, Default)]
struct ChannelExport {
    /// Posts, newest first.
    posts: Vec<RemoteMessage>,
    /// Replies keyed by the id they answer, in export order.
    replies: HashMap<u64, Vec<RemoteMessage>>,
}

impl ChannelExport {
    fn from_raw(raw: RawExport) -> Self {
        let mut export = Self::default();

        for msg in raw.messages {
            if msg.msg_type != "message" {
                continue;
            }
            let Some(id) = msg.id else { continue };
            let parent = msg.reply_to_message_id;
            let remote = to_remote(id, msg);

            match parent {
                Some(parent) => export.replies.entry(parent).or_default().push(remote),
                None => export.posts.push(remote),
            }
        }

        export.posts.reverse();
        export
    }
}

fn to_remote(id: u64, msg: RawMessage) -> RemoteMessage {
    let has_media = msg.photo.is_some() || msg.file.is_some() || msg.media_type.is_some();
    let reactions = msg
        .reactions
        .into_iter()
        .map(|r| {
            let emoji = r.emoji.or(r.kind).unwrap_or_else(|| "?".to_string());
            Reaction::new(emoji, r.count)
        })
        .collect();

    RemoteMessage {
        id,
        date: msg.date_unixtime.as_deref().and_then(parse_unix_timestamp),
        text: msg.text.as_ref().map(extract_text),
        has_media,
        reactions,
    }
}

/// Extracts text content from Telegram's `text` field.
///
/// The field is either a plain string or an array mixing strings and
/// entity objects such as `{"type": "link", "text": "https://..."}`.
fn extract_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(arr) => arr
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Object(obj) => obj
                    .get("text")
                    .and_then(|v| v.as_str())
                    .map(ToString::to_string),
                _ => None,
            })
            .collect::<String>(),
        _ => String::new(),
    }
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_file())
}

fn parse_unix_timestamp(ts: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    ts.parse::<i64>()
        .ok()
        .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
}

/// Strips `@`, `t.me/` and URL scheme decorations from a channel identifier.
///
/// ```rust
/// use chatharvest::source::normalize_channel;
///
/// assert_eq!(normalize_channel("@news"), "news");
/// assert_eq!(normalize_channel("https://t.me/news/"), "news");
/// ```
pub fn normalize_channel(channel: &str) -> &str {
    let mut name = channel.trim();
    for prefix in ["https://", "http://"] {
        name = name.strip_prefix(prefix).unwrap_or(name);
    }
    for prefix in ["www.t.me/", "t.me/", "telegram.me/", "@"] {
        name = name.strip_prefix(prefix).unwrap_or(name);
    }
    name.trim_end_matches('/')
}

/// A [`MessageSource`] over a directory of Telegram Desktop exports.
///
/// Exports are read on first use and cached for the life of the source, so a
/// channel listed twice is parsed once.
///
/// # Example
///
/// ```rust,no_run
/// use chatharvest::source::{ExportSource, MessageSource};
///
/// # async fn example() -> chatharvest::Result<()> {
/// let source = ExportSource::new("exports");
/// let stream = source.messages("@news", Some("election")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ExportSource {
    root: PathBuf,
    cache: Mutex<HashMap<String, Arc<ChannelExport>>>,
}

impl ExportSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Finds the export file for a channel.
    pub async fn resolve(&self, channel: &str) -> Result<PathBuf> {
        let name = normalize_channel(channel);
        if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
            return Err(HarvestError::channel_not_found(channel, None));
        }

        let candidate = self.root.join(format!("{}.json", name));
        if is_file(&candidate).await {
            return Ok(candidate);
        }
        let nested = self.root.join(name).join("result.json");
        if is_file(&nested).await {
            return Ok(nested);
        }
        Err(HarvestError::channel_not_found(channel, Some(candidate)))
    }

    async fn load(&self, channel: &str) -> Result<Arc<ChannelExport>> {
        let key = normalize_channel(channel).to_string();
        let mut cache = self.cache.lock().await;
        if let Some(export) = cache.get(&key) {
            return Ok(Arc::clone(export));
        }

        let path = self.resolve(channel).await?;
        let content = fs::read_to_string(&path).await?;
        let raw: RawExport = serde_json::from_str(&content).map_err(|e| {
            HarvestError::remote(channel, format!("invalid export {}: {}", path.display(), e))
        })?;

        let export = Arc::new(ChannelExport::from_raw(raw));
        tracing::debug!(
            channel,
            path = %path.display(),
            posts = export.posts.len(),
            "export loaded"
        );
        cache.insert(key, Arc::clone(&export));
        Ok(export)
    }
}

#[async_trait]
impl MessageSource for ExportSource {
    fn name(&self) -> &'static str {
        "telegram-export"
    }

    async fn messages(&self, channel: &str, search: Option<&str>) -> Result<MessageStream> {
        let export = self.load(channel).await?;
        let keyword = search.unwrap_or_default();
        let posts: Vec<Result<RemoteMessage>> = export
            .posts
            .iter()
            .filter(|m| m.matches_keyword(keyword))
            .cloned()
            .map(Ok)
            .collect();
        Ok(stream::iter(posts).boxed())
    }

    async fn replies(&self, channel: &str, message_id: u64) -> Result<MessageStream> {
        let export = self.load(channel).await?;
        let replies: Vec<Result<RemoteMessage>> = export
            .replies
            .get(&message_id)
            .map(|r| r.iter().cloned().map(Ok).collect())
            .unwrap_or_default();
        Ok(stream::iter(replies).boxed())
    }
}
