//! Language codes
//!
//! Codes are free-form strings (`en`, `hi`, `pt-BR`, ...). The only
//! restrictions come from codes being used as document field names.

use crate::error::{Error, Result};

/// A language code such as `en` or `hi`
pub type LanguageCode = String;

/// Source language for all auto-translation
pub const SOURCE_LANGUAGE: &str = "en";

/// Languages populated on creation, in display order
pub const SEED_LANGUAGES: [&str; 4] = ["en", "hi", "bn", "es"];

/// Languages auto-translated from English on creation
pub fn enrichment_targets() -> impl Iterator<Item = &'static str> {
    SEED_LANGUAGES
        .iter()
        .copied()
        .filter(|code| *code != SOURCE_LANGUAGE)
}

/// Trim and validate a user-supplied language code
pub fn validate_language_code(code: &str) -> Result<LanguageCode> {
    let code = code.trim();
    if code.is_empty() {
        return Err(Error::validation("Language code and value are required"));
    }
    if code.contains('.') || code.starts_with('$') {
        return Err(Error::validation(format!(
            "Invalid language code: {}",
            code
        )));
    }
    Ok(code.to_string())
}
