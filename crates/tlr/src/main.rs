use std::sync::Arc;

use tlr_core::config::Config;
use tlr_translate::HttpTranslator;

#[tokio::main]
async fn main() -> Result<(), tlr_core::Error> {
    let cfg = Arc::new(Config::load()?);
    tlr_core::logging::init("tlr", cfg.debug)?;

    let translator = Arc::new(HttpTranslator::from_config(&cfg)?);

    tlr_telegram::router::run_polling(cfg, translator)
        .await
        .map_err(|e| tlr_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
