use crate::domain::{ChatId, MessageId, UserId};

/// Where a message was posted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatKind {
    pub fn is_private(self) -> bool {
        matches!(self, ChatKind::Private)
    }
}

/// One received chat message, as delivered by the messenger adapter.
///
/// Telegram-specific fields live in the Telegram adapter.
#[derive(Clone, Debug)]
pub struct InboundMessage {
    pub chat_id: ChatId,
    pub chat_kind: ChatKind,
    /// Missing for anonymous senders (e.g. channel posts).
    pub sender: Option<UserId>,
    pub message_id: MessageId,
    pub text: Option<String>,
}
