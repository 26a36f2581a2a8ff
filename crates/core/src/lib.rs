//! Core types for the translation management service
//!
//! Shared by every crate in the workspace:
//! - The `Translation` entity and the request shapes that mutate it
//! - Language codes and the seed language set
//! - The error taxonomy surfaced at the API boundary
//! - The `Translator` trait implemented by external translation providers

pub mod error;
pub mod language;
pub mod traits;
pub mod translation;

pub use error::{Error, Result};
pub use language::{
    enrichment_targets, validate_language_code, LanguageCode, SEED_LANGUAGES, SOURCE_LANGUAGE,
};
pub use traits::Translator;
pub use translation::{
    AddLanguageRequest, CreateTranslationRequest, NewTranslation, Translation, TranslationMap,
    TranslationPatch, UpdateTranslationRequest,
};
