//! Reply thread collection.

use futures::StreamExt;

use crate::core::models::Reply;
use crate::error::Result;
use crate::source::MessageSource;

/// Collects the replies to one message.
///
/// Never fails: if the reply stream cannot be opened or breaks midway, the
/// partial list is dropped, a warning is logged and an empty list is
/// returned. The parent message is still collected.
pub async fn harvest_replies<S>(source: &S, channel: &str, message_id: u64) -> Vec<Reply>
where
    S: MessageSource + ?Sized,
{
    match collect_replies(source, channel, message_id).await {
        Ok(replies) => replies,
        Err(e) => {
            tracing::warn!(channel, message_id, error = %e, "reply stream failed, replies dropped");
            Vec::new()
        }
    }
}

async fn collect_replies<S>(source: &S, channel: &str, message_id: u64) -> Result<Vec<Reply>>
where
    S: MessageSource + ?Sized,
{
    let mut stream = source.replies(channel, message_id).await?;
    let mut replies = Vec::new();

    while let Some(item) = stream.next().await {
        let reply = Reply::from_remote(&item?);
        tracing::debug!(
            channel,
            message_id,
            has_media = reply.has_media,
            reactions = %reply.reactions,
            date = %reply.date,
            "reply"
        );
        replies.push(reply);
    }

    Ok(replies)
}
