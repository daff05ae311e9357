use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, trace};
use twilight_http::Client as HttpClient;
use twilight_model::id::marker::{ChannelMarker, MessageMarker};
use twilight_model::id::Id;

use crate::platforms::discord::parse_id;
use crate::platforms::MessageSink;
use crate::Error;
use rollcall_common::models::member::text_len;
use rollcall_common::models::message::MessageHandle;

/// Posts into, and edits messages in, a single channel or thread.
pub struct DiscordMessageSink {
    http: Arc<HttpClient>,
    channel_id: Id<ChannelMarker>,
}

impl DiscordMessageSink {
    pub fn new(http: Arc<HttpClient>, channel_id: Id<ChannelMarker>) -> Self {
        Self { http, channel_id }
    }

    /// Handle for an existing message in this sink's channel.
    pub fn handle_for(&self, message_id: Id<MessageMarker>) -> MessageHandle {
        MessageHandle::new(self.channel_id.to_string(), message_id.to_string())
    }
}

fn parse_handle(target: &MessageHandle) -> Result<(Id<ChannelMarker>, Id<MessageMarker>), Error> {
    Ok((
        parse_id(&target.channel_id, "channel")?,
        parse_id(&target.message_id, "message")?,
    ))
}

/// Content field for an edit. An empty string is sent as `null`, which
/// clears the text of an embed- or attachment-only message instead of being
/// rejected as an empty message.
fn edit_content(text: &str) -> Option<&str> {
    if text.is_empty() { None } else { Some(text) }
}

#[async_trait]
impl MessageSink for DiscordMessageSink {
    async fn send(&self, text: &str) -> Result<MessageHandle, Error> {
        let message = self
            .http
            .create_message(self.channel_id)
            .content(text)
            .await
            .map_err(|e| Error::transport("send message", e))?
            .model()
            .await
            .map_err(|e| Error::transport("send message", e))?;

        debug!("(DiscordMessageSink) sent message {} in {}", message.id, message.channel_id);
        Ok(MessageHandle::new(message.channel_id.to_string(), message.id.to_string()))
    }

    async fn edit(&self, target: &MessageHandle, text: &str) -> Result<(), Error> {
        let (channel_id, message_id) = parse_handle(target)?;
        self.http
            .update_message(channel_id, message_id)
            .content(edit_content(text))
            .await
            .map_err(|e| Error::transport("edit message", e))?;

        trace!("(DiscordMessageSink) edited message {message_id} => {} chars", text_len(text));
        Ok(())
    }

    async fn fetch_content(&self, target: &MessageHandle) -> Result<String, Error> {
        let (channel_id, message_id) = parse_handle(target)?;
        let message = self
            .http
            .message(channel_id, message_id)
            .await
            .map_err(|e| Error::transport("fetch message", e))?
            .model()
            .await
            .map_err(|e| Error::transport("fetch message", e))?;

        Ok(message.content)
    }
}
