//! Text processing for the translation service
//!
//! Currently a single concern: acquiring machine translations for newly
//! created entries without ever blocking on third-party availability.

pub mod translation;

pub use translation::{
    EnrichmentPipeline, FallbackTranslator, LibreTranslateClient, MyMemoryClient,
};
