//! Telegram update handlers.
//!
//! The handler only converts the update and hands it to the relay; the relay task does
//! the rest, so the dispatcher is never blocked by a slow translation.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{Chat, Message},
};

use tlr_core::{
    domain::{ChatId, MessageId, UserId},
    messaging::types::{ChatKind, InboundMessage},
    relay::Relay,
};

pub async fn handle_message(msg: Message, relay: Arc<Relay>) -> ResponseResult<()> {
    // Fire-and-forget; the join handle is intentionally dropped.
    let _ = relay.spawn(to_inbound(&msg));
    Ok(())
}

pub fn to_inbound(msg: &Message) -> InboundMessage {
    InboundMessage {
        chat_id: ChatId(msg.chat.id.0),
        chat_kind: chat_kind(&msg.chat),
        // Ids that do not fit `i64` are treated as an unknown sender.
        sender: msg
            .from()
            .and_then(|u| i64::try_from(u.id.0).ok())
            .map(UserId),
        message_id: MessageId(msg.id.0),
        text: msg.text().map(str::to_string),
    }
}

fn chat_kind(chat: &Chat) -> ChatKind {
    if chat.is_private() {
        ChatKind::Private
    } else if chat.is_supergroup() {
        ChatKind::Supergroup
    } else if chat.is_channel() {
        ChatKind::Channel
    } else {
        ChatKind::Group
    }
}
