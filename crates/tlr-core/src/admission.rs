use std::sync::Arc;

use crate::{config::Config, language::detect_iso639_1, messaging::types::InboundMessage};

/// Per-message admission decision: sender whitelist plus ignored-language check.
#[derive(Clone, Debug)]
pub struct AdmissionFilter {
    cfg: Arc<Config>,
}

impl AdmissionFilter {
    pub fn new(cfg: Arc<Config>) -> Self {
        Self { cfg }
    }

    /// Whitelist check.
    ///
    /// Private chats consult only the allowed users; every other chat kind consults only the
    /// allowed groups. With both lists empty everyone is admitted.
    pub fn is_allowed(&self, msg: &InboundMessage) -> bool {
        if self.cfg.is_open() {
            return true;
        }
        if msg.chat_kind.is_private() {
            msg.sender.is_some_and(|u| self.cfg.allowed_users.contains(&u.0))
        } else {
            self.cfg.allowed_groups.contains(&msg.chat_id.0)
        }
    }

    /// True iff the detected language of `text` is in the ignore set.
    ///
    /// Undetectable text is never ignored.
    pub fn should_ignore(&self, text: &str) -> bool {
        detect_iso639_1(text).is_some_and(|code| self.cfg.ignore_langs.contains(&code))
    }
}
