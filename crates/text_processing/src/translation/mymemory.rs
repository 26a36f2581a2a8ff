//! MyMemory client
//!
//! API format:
//! GET {base}/get?q=<text>&langpair=en|<target>
//! Response: { "responseData": { "translatedText": "..." }, "responseStatus": 200 }
//!
//! MyMemory reports quota and argument errors with HTTP 200 and a non-200
//! `responseStatus`, putting the error text in `translatedText`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use transdesk_core::{Error, Result, Translator, SOURCE_LANGUAGE};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetResponse {
    #[serde(default)]
    response_data: Option<ResponseData>,
    /// Integer or string depending on the error path
    #[serde(default)]
    response_status: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    #[serde(default)]
    translated_text: Option<String>,
}

fn status_ok(status: &Option<Value>) -> bool {
    match status {
        None => true,
        Some(Value::Number(n)) => n.as_u64() == Some(200),
        Some(Value::String(s)) => s.trim() == "200",
        Some(_) => false,
    }
}

/// Secondary translation provider
pub struct MyMemoryClient {
    http: reqwest::Client,
    endpoint: String,
}

impl MyMemoryClient {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}/get", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Translator for MyMemoryClient {
    async fn translate(&self, text: &str, target: &str) -> Result<String> {
        let langpair = format!("{}|{}", SOURCE_LANGUAGE, target);

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("q", text), ("langpair", langpair.as_str())])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::external(format!("MyMemory request failed: {}", e)))?;

        let parsed: GetResponse = response
            .json()
            .await
            .map_err(|e| Error::external(format!("MyMemory response unreadable: {}", e)))?;

        tracing::debug!(lang = %target, response = ?parsed, "MyMemory response");

        if !status_ok(&parsed.response_status) {
            return Err(Error::external(format!(
                "MyMemory responded with status {:?}",
                parsed.response_status
            )));
        }

        match parsed.response_data.and_then(|d| d.translated_text) {
            Some(translated) if !translated.is_empty() => Ok(translated),
            _ => Err(Error::external("MyMemory returned no translation")),
        }
    }

    fn name(&self) -> &str {
        "mymemory"
    }
}
