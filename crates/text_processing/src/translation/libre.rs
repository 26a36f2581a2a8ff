//! LibreTranslate client
//!
//! API format:
//! POST {base}/translate
//! { "q": "...", "source": "en", "target": "hi", "format": "text", "api_key": "" }
//! Response: { "translatedText": "..." }

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use transdesk_core::{Error, Result, Translator, SOURCE_LANGUAGE};

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    api_key: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    #[serde(default)]
    translated_text: Option<String>,
}

/// Primary translation provider
pub struct LibreTranslateClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl LibreTranslateClient {
    pub fn new(http: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}/translate", base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Translator for LibreTranslateClient {
    async fn translate(&self, text: &str, target: &str) -> Result<String> {
        let body = TranslateRequest {
            q: text,
            source: SOURCE_LANGUAGE,
            target,
            format: "text",
            api_key: &self.api_key,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::external(format!("LibreTranslate request failed: {}", e)))?;

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| Error::external(format!("LibreTranslate response unreadable: {}", e)))?;

        tracing::debug!(lang = %target, response = ?parsed, "LibreTranslate response");

        match parsed.translated_text {
            Some(translated) if !translated.is_empty() => Ok(translated),
            _ => Err(Error::external("LibreTranslate returned no translation")),
        }
    }

    fn name(&self) -> &str {
        "libretranslate"
    }
}
