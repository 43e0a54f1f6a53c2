//! Scripted in-memory source.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;

use crate::RemoteMessage;
use crate::error::{HarvestError, Result};

use super::{MessageSource, MessageStream};

#[derive(Debug, Clone)]
enum Item {
    Message(RemoteMessage),
    Error(String),
}

#[derive(Debug, Clone)]
enum Script {
    Items(Vec<Item>),
    FailOpen(String),
}

/// A [`MessageSource`] serving pre-built messages.
///
/// Channel messages are served in the order given, so callers should list
/// them newest first, as a real platform would. Failures can be scripted at
/// every level the harvester isolates: opening a channel, mid-stream, and
/// opening a reply stream.
///
/// The source also records which channels were opened and how many reply
/// streams were requested.
///
/// # Example
///
/// ```rust
/// use chatharvest::source::MemorySource;
/// use chatharvest::RemoteMessage;
///
/// let source = MemorySource::new()
///     .with_channel("@a", vec![RemoteMessage::new(1).with_text("post")])
///     .with_replies("@a", 1, vec![RemoteMessage::new(10).with_text("reply")])
///     .with_failing_channel("@broken", "flood wait");
/// ```
#[derive(Debug, Default)]
pub struct MemorySource {
    channels: HashMap<String, Script>,
    replies: HashMap<(String, u64), Script>,
    delay: Duration,
    opened: Mutex<Vec<String>>,
    reply_requests: Mutex<u64>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a channel serving `messages` in the given order.
    #[must_use]
    pub fn with_channel(
        mut self,
        channel: impl Into<String>,
        messages: Vec<RemoteMessage>,
    ) -> Self {
        let items = messages.into_iter().map(Item::Message).collect();
        self.channels.insert(channel.into(), Script::Items(items));
        self
    }

    /// Adds a channel whose stream cannot be opened.
    #[must_use]
    pub fn with_failing_channel(
        mut self,
        channel: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.channels
            .insert(channel.into(), Script::FailOpen(message.into()));
        self
    }

    /// Makes the stream of an existing channel yield an error after `after`
    /// messages. Messages past that point are never served.
    #[must_use]
    pub fn with_stream_error(
        mut self,
        channel: &str,
        after: usize,
        message: impl Into<String>,
    ) -> Self {
        if let Some(Script::Items(items)) = self.channels.get_mut(channel) {
            let at = after.min(items.len());
            items.insert(at, Item::Error(message.into()));
        }
        self
    }

    /// Sets the replies served for one message.
    #[must_use]
    pub fn with_replies(
        mut self,
        channel: impl Into<String>,
        message_id: u64,
        replies: Vec<RemoteMessage>,
    ) -> Self {
        let items = replies.into_iter().map(Item::Message).collect();
        self.replies
            .insert((channel.into(), message_id), Script::Items(items));
        self
    }

    /// Makes the reply stream of one message fail after `after` replies.
    ///
    /// With `after == 0` the stream fails to open.
    #[must_use]
    pub fn with_failing_replies(
        mut self,
        channel: impl Into<String>,
        message_id: u64,
        after: usize,
        message: impl Into<String>,
    ) -> Self {
        let key = (channel.into(), message_id);
        let message = message.into();
        let script = if after == 0 {
            Script::FailOpen(message)
        } else {
            let mut items: Vec<Item> = (1..=after as u64)
                .map(|i| {
                    Item::Message(RemoteMessage::new(message_id * 1_000 + i).with_text("partial"))
                })
                .collect();
            items.push(Item::Error(message));
            Script::Items(items)
        };
        self.replies.insert(key, script);
        self
    }

    /// Delays every served item, simulating network latency.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Channels whose message stream was requested, in request order.
    pub fn opened_channels(&self) -> Vec<String> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of reply streams requested.
    pub fn reply_requests(&self) -> u64 {
        *self
            .reply_requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn stream(&self, channel: &str, items: Vec<Item>) -> MessageStream {
        let delay = self.delay;
        let channel = channel.to_string();
        stream::iter(items)
            .then(move |item| {
                let channel = channel.clone();
                async move {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    match item {
                        Item::Message(msg) => Ok(msg),
                        Item::Error(message) => Err(HarvestError::remote(channel, message)),
                    }
                }
            })
            .boxed()
    }
}

#[async_trait]
impl MessageSource for MemorySource {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn messages(&self, channel: &str, search: Option<&str>) -> Result<MessageStream> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(channel.to_string());

        match self.channels.get(channel) {
            None => Err(HarvestError::channel_not_found(channel, None)),
            Some(Script::FailOpen(message)) => Err(HarvestError::remote(channel, message.clone())),
            Some(Script::Items(items)) => {
                let keyword = search.unwrap_or_default();
                let items = items
                    .iter()
                    .filter(|item| match item {
                        Item::Message(msg) => msg.matches_keyword(keyword),
                        Item::Error(_) => true,
                    })
                    .cloned()
                    .collect();
                Ok(self.stream(channel, items))
            }
        }
    }

    async fn replies(&self, channel: &str, message_id: u64) -> Result<MessageStream> {
        *self
            .reply_requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;

        match self.replies.get(&(channel.to_string(), message_id)) {
            None => Ok(stream::empty::<Result<RemoteMessage>>().boxed()),
            Some(Script::FailOpen(message)) => Err(HarvestError::remote(channel, message.clone())),
            Some(Script::Items(items)) => Ok(self.stream(channel, items.clone())),
        }
    }
}
