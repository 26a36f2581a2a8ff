//! Provider traits

use async_trait::async_trait;

use crate::error::Result;

/// An external machine-translation provider
///
/// Implementations translate from English into `target`. Any failure,
/// including an empty result, is reported as an error so that callers can
/// fall through to the next provider.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate English `text` into `target`
    async fn translate(&self, text: &str, target: &str) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
