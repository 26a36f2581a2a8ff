//! Enrichment pipeline
//!
//! `translate` never fails: when every provider fails the English text is
//! returned unchanged. `translate_all` fans out one task per language and
//! settles all of them, so a failed or panicked task only affects its own
//! language.

use std::sync::Arc;

use futures::future::join_all;
use transdesk_config::TranslationServiceConfig;
use transdesk_core::{LanguageCode, Result, Translator, SOURCE_LANGUAGE};

/// Best-effort machine translation for new entries
#[derive(Clone)]
pub struct EnrichmentPipeline {
    translator: Arc<dyn Translator>,
}

impl EnrichmentPipeline {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self { translator }
    }

    /// LibreTranslate -> MyMemory chain from config
    pub fn from_config(config: &TranslationServiceConfig) -> Result<Self> {
        Ok(Self::new(super::create_translator(config)?))
    }

    pub fn translator_name(&self) -> &str {
        self.translator.name()
    }

    /// Translate English `text` into `target`, or return `text` unchanged
    pub async fn translate(&self, text: &str, target: &str) -> String {
        if target == SOURCE_LANGUAGE || text.trim().is_empty() {
            return text.to_string();
        }

        tracing::info!(lang = %target, text_len = text.len(), "Translating");

        match self.translator.translate(text, target).await {
            Ok(translated) => translated,
            Err(e) => {
                tracing::warn!(
                    lang = %target,
                    error = %e,
                    "All translation services failed, using original text"
                );
                text.to_string()
            },
        }
    }

    /// Translate into every target concurrently, in `targets` order
    ///
    /// Each language runs in a detached task; dropping the returned future
    /// does not cancel translations already in flight.
    pub async fn translate_all<I, S>(&self, text: &str, targets: I) -> Vec<(LanguageCode, String)>
    where
        I: IntoIterator<Item = S>,
        S: Into<LanguageCode>,
    {
        let targets: Vec<LanguageCode> = targets.into_iter().map(Into::into).collect();

        let tasks = targets.iter().map(|target| {
            let pipeline = self.clone();
            let text = text.to_string();
            let target = target.clone();
            tokio::spawn(async move { pipeline.translate(&text, &target).await })
        });
        let settled = join_all(tasks).await;

        targets
            .into_iter()
            .zip(settled)
            .map(|(target, outcome)| match outcome {
                Ok(translated) => (target, translated),
                Err(e) => {
                    tracing::error!(lang = %target, error = %e, "Translation task failed");
                    (target, text.to_string())
                },
            })
            .collect()
    }
}

impl std::fmt::Debug for EnrichmentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichmentPipeline")
            .field("translator", &self.translator.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use transdesk_core::Error;

    /// Succeeds for the languages it knows, fails or panics otherwise
    struct Scripted {
        replies: HashMap<&'static str, &'static str>,
        panic_on: Option<&'static str>,
    }

    #[async_trait]
    impl Translator for Scripted {
        async fn translate(&self, _text: &str, target: &str) -> Result<String> {
            if self.panic_on == Some(target) {
                panic!("provider bug");
            }
            self.replies
                .get(target)
                .map(|s| s.to_string())
                .ok_or_else(|| Error::external("unsupported"))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn pipeline(
        replies: &[(&'static str, &'static str)],
        panic_on: Option<&'static str>,
    ) -> EnrichmentPipeline {
        EnrichmentPipeline::new(Arc::new(Scripted {
            replies: replies.iter().copied().collect(),
            panic_on,
        }))
    }

    #[tokio::test]
    async fn test_identity_fallback() {
        let p = pipeline(&[], None);
        for lang in ["hi", "bn", "es", "it"] {
            assert_eq!(p.translate("Hello", lang).await, "Hello");
        }
    }

    #[tokio::test]
    async fn test_source_language_passthrough() {
        let p = pipeline(&[("en", "should not be used")], None);
        assert_eq!(p.translate("Hello", "en").await, "Hello");
    }

    #[tokio::test]
    async fn test_failures_are_isolated_per_language() {
        let p = pipeline(&[("bn", "হ্যালো"), ("es", "Hola")], None);
        let results = p.translate_all("Hello", ["hi", "bn", "es"]).await;
        assert_eq!(
            results,
            vec![
                ("hi".to_string(), "Hello".to_string()),
                ("bn".to_string(), "হ্যালো".to_string()),
                ("es".to_string(), "Hola".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_panicking_task_falls_back() {
        let p = pipeline(&[("bn", "হ্যালো")], Some("hi"));
        let results = p.translate_all("Hello", ["hi", "bn"]).await;
        assert_eq!(results[0], ("hi".to_string(), "Hello".to_string()));
        assert_eq!(results[1], ("bn".to_string(), "হ্যালো".to_string()));
    }
}
