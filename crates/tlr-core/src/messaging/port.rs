use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageId, MessageRef},
    Result,
};

/// Outbound side of the chat service.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    /// Send plain `text` to `chat_id` as a reply to `reply_to`.
    async fn send_reply(
        &self,
        chat_id: ChatId,
        reply_to: MessageId,
        text: &str,
    ) -> Result<MessageRef>;
}
