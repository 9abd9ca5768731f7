//! HTTP translation adapter.
//!
//! Talks to a DeepLX-style endpoint: `POST {text, source_lang, target_lang}` returning `{data}`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use tlr_core::{config::Config, errors::Error, ports::Translator, Result};

/// Source language sent with every request; the service detects it.
pub const SOURCE_LANG_AUTO: &str = "auto";

#[derive(Clone, Debug, Serialize)]
pub struct TranslationRequest<'a> {
    pub text: &'a str,
    pub source_lang: &'a str,
    pub target_lang: &'a str,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TranslationResponse {
    pub data: String,
}

#[derive(Clone, Debug)]
pub struct HttpTranslator {
    api_url: String,
    target_lang: String,
    http: reqwest::Client,
}

impl HttpTranslator {
    pub fn new(api_url: impl Into<String>, target_lang: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::External(format!("http client build error: {e}")))?;
        Ok(Self {
            api_url: api_url.into(),
            target_lang: target_lang.into(),
            http,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(cfg.api_url.clone(), cfg.target_lang.clone())
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        let req = TranslationRequest {
            text,
            source_lang: SOURCE_LANG_AUTO,
            target_lang: &self.target_lang,
        };

        let resp = self
            .http
            .post(&self.api_url)
            .json(&req)
            .send()
            .await
            .map_err(|e| Error::External(format!("translation request error: {e}")))?;

        let status = resp.status();
        // Read the whole body before inspecting it so the connection is released on every path.
        let body = resp
            .text()
            .await
            .map_err(|e| Error::External(format!("translation body error: {e}")))?;

        if !status.is_success() {
            return Err(Error::Translation {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let parsed: TranslationResponse = serde_json::from_str(&body)?;
        debug!(chars = parsed.data.chars().count(), "translation received");
        Ok(parsed.data)
    }
}
