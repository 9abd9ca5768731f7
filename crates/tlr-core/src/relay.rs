//! Per-message pipeline: admission, translation, reply.
//!
//! Every message runs in its own task. Failures are logged and the message is dropped;
//! nothing is ever sent back to the sender except a successful translation.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{
    admission::AdmissionFilter,
    config::Config,
    domain::MessageRef,
    messaging::{port::MessagingPort, types::InboundMessage},
    ports::Translator,
};

/// Terminal state of one handled message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    NoText,
    NotAllowed,
    Ignored,
    TranslationFailed,
    Sent(MessageRef),
    SendFailed,
}

pub struct Relay {
    filter: AdmissionFilter,
    translator: Arc<dyn Translator>,
    messenger: Arc<dyn MessagingPort>,
}

impl Relay {
    pub fn new(
        cfg: Arc<Config>,
        translator: Arc<dyn Translator>,
        messenger: Arc<dyn MessagingPort>,
    ) -> Self {
        Self {
            filter: AdmissionFilter::new(cfg),
            translator,
            messenger,
        }
    }

    /// Fire-and-forget: hand `msg` to a fresh task and return immediately.
    ///
    /// Messages without text are skipped without spawning anything.
    pub fn spawn(self: &Arc<Self>, msg: InboundMessage) -> Option<JoinHandle<Outcome>> {
        msg.text.as_ref()?;
        let relay = Arc::clone(self);
        Some(tokio::spawn(async move { relay.handle(msg).await }))
    }

    pub async fn handle(&self, msg: InboundMessage) -> Outcome {
        let Some(text) = msg.text.as_deref() else {
            return Outcome::NoText;
        };
        let chat_id = msg.chat_id.0;
        let message_id = msg.message_id.0;

        if !self.filter.is_allowed(&msg) {
            info!(chat_id, "message from non-whitelisted source");
            return Outcome::NotAllowed;
        }

        if self.filter.should_ignore(text) {
            debug!(chat_id, message_id, "message language is ignored");
            return Outcome::Ignored;
        }

        let translated = match self.translator.translate(text).await {
            Ok(t) => t,
            Err(e) => {
                warn!(chat_id, message_id, error = %e, "translation error");
                return Outcome::TranslationFailed;
            }
        };

        match self
            .messenger
            .send_reply(msg.chat_id, msg.message_id, &translated)
            .await
        {
            Ok(sent) => {
                debug!(chat_id, message_id, reply_id = sent.message_id.0, "reply sent");
                Outcome::Sent(sent)
            }
            Err(e) => {
                warn!(chat_id, message_id, error = %e, "error sending message");
                Outcome::SendFailed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashSet,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex,
        },
        time::Duration,
    };

    use async_trait::async_trait;

    use super::*;
    use crate::{
        domain::{ChatId, MessageId, UserId},
        errors::Error,
        messaging::types::ChatKind,
        Result,
    };

    const ENGLISH: &str =
        "The weather is really nice today, so let us go for a long walk in the park together.";
    const CHINESE: &str = "今天天气很好，我们一起去公园散步吧。";

    #[derive(Default)]
    struct RecordingMessenger {
        fail: bool,
        sent: Mutex<Vec<(ChatId, MessageId, String)>>,
    }

    #[async_trait]
    impl MessagingPort for RecordingMessenger {
        async fn send_reply(
            &self,
            chat_id: ChatId,
            reply_to: MessageId,
            text: &str,
        ) -> Result<MessageRef> {
            if self.fail {
                return Err(Error::External("telegram error: blocked".to_string()));
            }
            let mut sent = self.sent.lock().unwrap();
            sent.push((chat_id, reply_to, text.to_string()));
            Ok(MessageRef {
                chat_id,
                message_id: MessageId(1000 + sent.len() as i32),
            })
        }
    }

    /// Replies with a fixed string, fails, or hangs forever on texts containing "slow".
    struct ScriptedTranslator {
        reply: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl ScriptedTranslator {
        fn ok(reply: &'static str) -> Self {
            Self {
                reply: Some(reply),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Translator for ScriptedTranslator {
        async fn translate(&self, text: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if text.contains("slow") {
                std::future::pending::<()>().await;
            }
            match self.reply {
                Some(r) => Ok(r.to_string()),
                None => Err(Error::Translation {
                    status: 500,
                    body: "boom".to_string(),
                }),
            }
        }
    }

    fn cfg(groups: &[i64], users: &[i64]) -> Arc<Config> {
        Arc::new(Config {
            bot_token: "t".to_string(),
            target_lang: "ZH".to_string(),
            api_url: "http://127.0.0.1:1188/translate".to_string(),
            ignore_langs: HashSet::from(["ZH".to_string()]),
            allowed_groups: groups.iter().copied().collect(),
            allowed_users: users.iter().copied().collect(),
            debug: false,
        })
    }

    fn private(text: &str) -> InboundMessage {
        InboundMessage {
            chat_id: ChatId(7),
            chat_kind: ChatKind::Private,
            sender: Some(UserId(7)),
            message_id: MessageId(55),
            text: Some(text.to_string()),
        }
    }

    fn relay(
        cfg: Arc<Config>,
        translator: Arc<ScriptedTranslator>,
        messenger: Arc<RecordingMessenger>,
    ) -> Arc<Relay> {
        Arc::new(Relay::new(cfg, translator, messenger))
    }

    #[tokio::test]
    async fn translates_and_replies_to_original_message() {
        let translator = Arc::new(ScriptedTranslator::ok("你好"));
        let messenger = Arc::new(RecordingMessenger::default());
        let r = relay(cfg(&[], &[]), translator.clone(), messenger.clone());

        let outcome = r.handle(private(ENGLISH)).await;

        assert_eq!(
            outcome,
            Outcome::Sent(MessageRef {
                chat_id: ChatId(7),
                message_id: MessageId(1001),
            })
        );
        assert_eq!(translator.calls.load(Ordering::SeqCst), 1);
        let sent = messenger.sent.lock().unwrap();
        assert_eq!(*sent, vec![(ChatId(7), MessageId(55), "你好".to_string())]);
    }

    #[tokio::test]
    async fn ignored_language_skips_translation() {
        let translator = Arc::new(ScriptedTranslator::ok("你好"));
        let messenger = Arc::new(RecordingMessenger::default());
        let r = relay(cfg(&[], &[]), translator.clone(), messenger.clone());

        assert_eq!(r.handle(private(CHINESE)).await, Outcome::Ignored);
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
        assert!(messenger.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_whitelisted_group_is_dropped_regardless_of_language() {
        let translator = Arc::new(ScriptedTranslator::ok("你好"));
        let messenger = Arc::new(RecordingMessenger::default());
        let r = relay(cfg(&[100], &[]), translator.clone(), messenger.clone());

        for text in [ENGLISH, CHINESE] {
            let msg = InboundMessage {
                chat_id: ChatId(200),
                chat_kind: ChatKind::Group,
                sender: Some(UserId(7)),
                message_id: MessageId(1),
                text: Some(text.to_string()),
            };
            assert_eq!(r.handle(msg).await, Outcome::NotAllowed);
        }
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
        assert!(messenger.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn translation_error_sends_nothing() {
        let translator = Arc::new(ScriptedTranslator::failing());
        let messenger = Arc::new(RecordingMessenger::default());
        let r = relay(cfg(&[], &[]), translator.clone(), messenger.clone());

        assert_eq!(r.handle(private(ENGLISH)).await, Outcome::TranslationFailed);
        assert_eq!(translator.calls.load(Ordering::SeqCst), 1);
        assert!(messenger.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn send_failure_is_terminal() {
        let translator = Arc::new(ScriptedTranslator::ok("你好"));
        let messenger = Arc::new(RecordingMessenger {
            fail: true,
            ..Default::default()
        });
        let r = relay(cfg(&[], &[]), translator.clone(), messenger);

        assert_eq!(r.handle(private(ENGLISH)).await, Outcome::SendFailed);
        assert_eq!(translator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_translation_is_still_sent() {
        let translator = Arc::new(ScriptedTranslator::ok(""));
        let messenger = Arc::new(RecordingMessenger::default());
        let r = relay(cfg(&[], &[]), translator, messenger.clone());

        assert!(matches!(r.handle(private(ENGLISH)).await, Outcome::Sent(_)));
        assert_eq!(messenger.sent.lock().unwrap()[0].2, "");
    }

    #[tokio::test]
    async fn text_less_message_is_not_spawned() {
        let translator = Arc::new(ScriptedTranslator::ok("你好"));
        let messenger = Arc::new(RecordingMessenger::default());
        let r = relay(cfg(&[], &[]), translator.clone(), messenger);

        let mut msg = private(ENGLISH);
        msg.text = None;
        assert!(r.spawn(msg.clone()).is_none());
        assert_eq!(r.handle(msg).await, Outcome::NoText);
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn hung_translation_does_not_block_other_messages() {
        let translator = Arc::new(ScriptedTranslator::ok("你好"));
        let messenger = Arc::new(RecordingMessenger::default());
        let r = relay(cfg(&[], &[]), translator, messenger.clone());

        let slow = r
            .spawn(private(
                "This one is slow because the remote service never answers the request at all.",
            ))
            .unwrap();
        let fast = r.spawn(private(ENGLISH)).unwrap();

        let outcome = tokio::time::timeout(Duration::from_secs(5), fast)
            .await
            .expect("fast message finished")
            .unwrap();
        assert!(matches!(outcome, Outcome::Sent(_)));
        assert!(!slow.is_finished());
        slow.abort();

        assert_eq!(messenger.sent.lock().unwrap().len(), 1);
    }
}
