use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};
use tracing::info;

use tlr_core::{config::Config, messaging::port::MessagingPort, ports::Translator, relay::Relay};

use crate::handlers;
use crate::TelegramMessenger;

/// Authenticate, then long-poll updates until the process is stopped.
///
/// A failed `getMe` is fatal: nothing useful can happen without a valid bot.
pub async fn run_polling(
    cfg: Arc<Config>,
    translator: Arc<dyn Translator>,
) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.bot_token.clone());

    let me = bot
        .get_me()
        .await
        .map_err(|e| anyhow::anyhow!("telegram authorization failed: {e}"))?;

    info!(account = %me.username(), "authorized on account");
    info!(api_url = %cfg.api_url, target_lang = %cfg.target_lang, "translation endpoint");
    info!(
        allowed_groups = cfg.allowed_groups.len(),
        allowed_users = cfg.allowed_users.len(),
        open = cfg.is_open(),
        "whitelist"
    );

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let relay = Arc::new(Relay::new(cfg, translator, messenger));

    let handler = Update::filter_message().endpoint(handlers::handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![relay])
        .build()
        .dispatch()
        .await;

    Ok(())
}
