//! Remote message sources.
//!
//! A [`MessageSource`] is everything the harvester needs from a messaging
//! platform: a paginated stream of a channel's messages, newest first, and a
//! stream of the replies to one message. Pagination is the source's business;
//! the harvester only pulls items.
//!
//! Two implementations ship with the crate:
//!
//! - [`MemorySource`] - scripted in-memory channels, for tests and embedding
//! - [`ExportSource`] - Telegram Desktop JSON exports on disk
//!   (requires the `export-source` feature)
//!
//! # Example
//!
//! ```rust
//! use chatharvest::source::{MemorySource, MessageSource};
//! use chatharvest::RemoteMessage;
//! use futures::TryStreamExt;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> chatharvest::Result<()> {
//! let source = MemorySource::new()
//!     .with_channel("@news", vec![RemoteMessage::new(2), RemoteMessage::new(1)]);
//!
//! let ids: Vec<u64> = source
//!     .messages("@news", None)
//!     .await?
//!     .map_ok(|m| m.id)
//!     .try_collect()
//!     .await?;
//! assert_eq!(ids, vec![2, 1]);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::RemoteMessage;
use crate::error::Result;

#[cfg(feature = "export-source")]
mod export;
mod memory;

#[cfg(feature = "export-source")]
pub use export::{ExportSource, normalize_channel};
pub use memory::MemorySource;

/// A stream of messages pulled page by page from a source.
///
/// An `Err` item means the stream broke and will yield nothing useful after it.
pub type MessageStream = BoxStream<'static, Result<RemoteMessage>>;

/// Capability to list channel messages and their replies.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Returns the name of the source, for logs.
    fn name(&self) -> &'static str;

    /// Opens the message stream of `channel`, newest first.
    ///
    /// With `search`, only messages whose text contains it (ignoring case)
    /// are yielded.
    async fn messages(&self, channel: &str, search: Option<&str>) -> Result<MessageStream>;

    /// Opens the reply stream of one message.
    async fn replies(&self, channel: &str, message_id: u64) -> Result<MessageStream>;
}
