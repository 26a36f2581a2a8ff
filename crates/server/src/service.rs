//! Translation resource operations
//!
//! Every operation that touches storage first makes sure the store is
//! reachable, so an outage surfaces as `Error::Connection` instead of a hang.

use std::sync::Arc;

use tracing::info;

use transdesk_core::{
    enrichment_targets, AddLanguageRequest, CreateTranslationRequest, Error, NewTranslation,
    Result, Translation, UpdateTranslationRequest,
};
use transdesk_persistence::TranslationStore;
use transdesk_text_processing::EnrichmentPipeline;

pub struct TranslationService {
    store: Arc<dyn TranslationStore>,
    pipeline: EnrichmentPipeline,
}

impl TranslationService {
    pub fn new(store: Arc<dyn TranslationStore>, pipeline: EnrichmentPipeline) -> Self {
        Self { store, pipeline }
    }

    /// Reachability check, returns the backend name
    pub async fn health(&self) -> Result<&'static str> {
        self.store.ensure_ready().await?;
        Ok(self.store.backend())
    }

    /// Create an entry, auto-translating the seed languages
    ///
    /// The key pre-check is a fast path only; the store's uniqueness
    /// constraint decides races between concurrent creates.
    pub async fn create(&self, request: &CreateTranslationRequest) -> Result<Translation> {
        let (key, english) = request.validate()?;
        self.store.ensure_ready().await?;

        if self.store.find_by_key(&key).await?.is_some() {
            return Err(Error::duplicate_key());
        }

        let enriched = self.pipeline.translate_all(&english, enrichment_targets()).await;
        let new = NewTranslation::seeded(key, english, enriched);
        tracing::debug!(key = %new.key, translations = ?new.translations, "Generated translations");

        let saved = self.store.insert(new).await?;
        info!(id = %saved.id, key = %saved.key, "Created translation");
        Ok(saved)
    }

    /// All entries newest first, optionally filtered
    ///
    /// The term is matched as given; only an empty term means no filter.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Translation>> {
        self.store.ensure_ready().await?;
        let search = search.filter(|s| !s.is_empty());
        Ok(self.store.list(search).await?)
    }

    pub async fn get(&self, id: &str) -> Result<Translation> {
        self.store.ensure_ready().await?;
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(Error::translation_not_found)
    }

    /// Replace the supplied fields wholesale
    pub async fn update(&self, id: &str, request: UpdateTranslationRequest) -> Result<Translation> {
        let patch = request.into_patch()?;
        self.store.ensure_ready().await?;

        let updated = if patch.is_empty() {
            self.store.find_by_id(id).await?
        } else {
            self.store.update(id, patch).await?
        };
        let updated = updated.ok_or_else(Error::translation_not_found)?;
        info!(id = %updated.id, key = %updated.key, "Updated translation");
        Ok(updated)
    }

    /// Set one language value, registering the code once
    pub async fn add_language(
        &self,
        id: &str,
        request: &AddLanguageRequest,
    ) -> Result<Translation> {
        let (code, value) = request.validate()?;
        self.store.ensure_ready().await?;

        let updated = self
            .store
            .add_language(id, &code, &value)
            .await?
            .ok_or_else(Error::translation_not_found)?;
        info!(id = %updated.id, lang = %code, "Added language");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.store.ensure_ready().await?;
        if self.store.delete(id).await? {
            info!(id = %id, "Deleted translation");
            Ok(())
        } else {
            Err(Error::translation_not_found())
        }
    }
}
