//! Translation enrichment
//!
//! Provider chain used when a translation entry is created:
//! LibreTranslate first, MyMemory second, and the untranslated English text
//! when both fail. Each target language runs in its own task so one failure
//! never affects another.

mod fallback;
mod libre;
mod mymemory;
mod pipeline;

pub use fallback::FallbackTranslator;
pub use libre::LibreTranslateClient;
pub use mymemory::MyMemoryClient;
pub use pipeline::EnrichmentPipeline;

use std::sync::Arc;

use transdesk_config::TranslationServiceConfig;
use transdesk_core::{Error, Result, Translator};

/// Shared HTTP client with the per-request provider timeout
pub fn http_client(config: &TranslationServiceConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.timeout())
        .user_agent(concat!("transdesk/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {}", e)))
}

/// Create the primary -> secondary provider chain from config
pub fn create_translator(config: &TranslationServiceConfig) -> Result<Arc<dyn Translator>> {
    let client = http_client(config)?;

    let primary = Arc::new(LibreTranslateClient::new(
        client.clone(),
        &config.libretranslate_url,
        &config.libretranslate_api_key,
    ));
    let secondary = Arc::new(MyMemoryClient::new(client, &config.mymemory_url));

    tracing::info!(
        primary = %config.libretranslate_url,
        secondary = %config.mymemory_url,
        timeout_ms = config.timeout_ms,
        "Translation providers configured"
    );

    Ok(Arc::new(FallbackTranslator::new(primary, secondary)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_translator_from_defaults() {
        let translator = create_translator(&TranslationServiceConfig::default()).unwrap();
        assert_eq!(translator.name(), "libretranslate->mymemory");
    }
}
