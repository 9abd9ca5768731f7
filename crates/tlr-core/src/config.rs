use std::collections::HashSet;

use clap::Parser;

use crate::{errors::Error, Result};

pub const DEFAULT_TARGET_LANG: &str = "ZH";
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:1188/translate";

/// Command-line flags. Each flag falls back to its environment variable, then to the default.
#[derive(Parser, Clone, Debug)]
#[command(name = "tlr")]
#[command(about = "Telegram bot that translates whitelisted chat messages through an HTTP service.")]
pub struct Args {
    /// Telegram bot token
    #[arg(long = "token", env = "BOT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Target language for translation
    #[arg(long = "target", env = "TARGET_LANG", default_value = DEFAULT_TARGET_LANG)]
    pub target: String,

    /// API URL for translation service
    #[arg(long = "api", env = "API_URL", default_value = DEFAULT_API_URL)]
    pub api: String,

    /// Comma-separated list of languages to ignore
    #[arg(long = "ignore", env = "IGNORE_LANGS", default_value = DEFAULT_TARGET_LANG)]
    pub ignore: String,

    /// Comma-separated list of allowed group IDs
    #[arg(long = "groups", env = "ALLOWED_GROUPS", default_value = "")]
    pub groups: String,

    /// Comma-separated list of allowed user IDs
    #[arg(long = "users", env = "ALLOWED_USERS", default_value = "")]
    pub users: String,

    /// Verbose logging
    #[arg(long, env = "DEBUG")]
    pub debug: bool,
}

/// Typed, immutable configuration shared by every message task.
#[derive(Clone, Debug)]
pub struct Config {
    pub bot_token: String,
    pub target_lang: String,
    pub api_url: String,
    /// Upper-cased ISO 639-1 codes whose messages are left untranslated.
    pub ignore_langs: HashSet<String>,
    pub allowed_groups: HashSet<i64>,
    pub allowed_users: HashSet<i64>,
    pub debug: bool,
}

impl Config {
    /// Parse flags (with env fallback) and build the configuration.
    pub fn load() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    pub fn from_args(args: Args) -> Result<Self> {
        let bot_token = args.token.unwrap_or_default();
        if bot_token.trim().is_empty() {
            return Err(Error::Config(
                "bot token is required (--token or BOT_TOKEN)".to_string(),
            ));
        }

        Ok(Self {
            bot_token,
            target_lang: args.target,
            api_url: args.api,
            ignore_langs: parse_lang_set(&args.ignore),
            allowed_groups: parse_id_set(&args.groups),
            allowed_users: parse_id_set(&args.users),
            debug: args.debug,
        })
    }

    /// No whitelist configured: every sender is admitted.
    pub fn is_open(&self) -> bool {
        self.allowed_groups.is_empty() && self.allowed_users.is_empty()
    }
}

/// Split on commas, trim and upper-case each token.
///
/// Empty tokens are kept; no detected language code is ever empty, so they never match.
pub fn parse_lang_set(raw: &str) -> HashSet<String> {
    raw.split(',').map(|s| s.trim().to_uppercase()).collect()
}

/// Split on commas and keep the tokens that parse as `i64`. Malformed entries are dropped.
pub fn parse_id_set(raw: &str) -> HashSet<i64> {
    raw.split(',')
        .filter_map(|s| s.trim().parse::<i64>().ok())
        .collect()
}
