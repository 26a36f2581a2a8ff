//! Shared application state

use std::sync::Arc;

use transdesk_persistence::TranslationStore;
use transdesk_text_processing::EnrichmentPipeline;

use crate::service::TranslationService;

/// State handed to every handler; cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub translations: Arc<TranslationService>,
}

impl AppState {
    pub fn new(store: Arc<dyn TranslationStore>, pipeline: EnrichmentPipeline) -> Self {
        Self {
            translations: Arc::new(TranslationService::new(store, pipeline)),
        }
    }
}
