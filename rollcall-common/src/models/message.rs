/// Opaque reference to a message the sink created or can edit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageHandle {
    pub channel_id: String,
    pub message_id: String,
}

impl MessageHandle {
    pub fn new(channel_id: impl Into<String>, message_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            message_id: message_id.into(),
        }
    }
}

/// A message temporarily repurposed for mentions, plus the content it must
/// get back afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestorableTarget {
    pub handle: MessageHandle,
    pub original_content: String,
}
