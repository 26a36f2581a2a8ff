//! Primary/secondary provider chain

use std::sync::Arc;

use async_trait::async_trait;
use transdesk_core::{Result, Translator};

/// Translator that tries primary first, then falls back to secondary
pub struct FallbackTranslator {
    primary: Arc<dyn Translator>,
    fallback: Arc<dyn Translator>,
    name: String,
}

impl FallbackTranslator {
    pub fn new(primary: Arc<dyn Translator>, fallback: Arc<dyn Translator>) -> Self {
        let name = format!("{}->{}", primary.name(), fallback.name());
        Self {
            primary,
            fallback,
            name,
        }
    }
}

#[async_trait]
impl Translator for FallbackTranslator {
    async fn translate(&self, text: &str, target: &str) -> Result<String> {
        match self.primary.translate(text, target).await {
            Ok(translation) => {
                tracing::trace!(
                    provider = self.primary.name(),
                    lang = %target,
                    "Primary translator succeeded"
                );
                Ok(translation)
            },
            Err(e) => {
                tracing::warn!(
                    provider = self.primary.name(),
                    fallback = self.fallback.name(),
                    lang = %target,
                    error = %e,
                    "Primary translator failed, trying fallback"
                );
                self.fallback.translate(text, target).await
            },
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use transdesk_core::Error;

    struct Fixed {
        name: &'static str,
        reply: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn new(name: &'static str, reply: Option<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                name,
                reply,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Translator for Fixed {
        async fn translate(&self, _text: &str, _target: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .map(str::to_string)
                .ok_or_else(|| Error::external("down"))
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let primary = Fixed::new("a", Some("Hola"));
        let fallback = Fixed::new("b", Some("unused"));
        let chain = FallbackTranslator::new(primary.clone(), fallback.clone());

        assert_eq!(chain.translate("Hello", "es").await.unwrap(), "Hola");
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
        assert_eq!(chain.name(), "a->b");
    }

    #[tokio::test]
    async fn test_primary_failure_uses_fallback() {
        let primary = Fixed::new("a", None);
        let fallback = Fixed::new("b", Some("Hola"));
        let chain = FallbackTranslator::new(primary.clone(), fallback.clone());

        assert_eq!(chain.translate("Hello", "es").await.unwrap(), "Hola");
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_both_failing_is_error() {
        let chain = FallbackTranslator::new(Fixed::new("a", None), Fixed::new("b", None));
        assert!(chain.translate("Hello", "es").await.is_err());
    }
}
