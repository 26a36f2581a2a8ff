//! Translation entity and request shapes
//!
//! A `Translation` maps a unique key to an English source string plus
//! translated text for any number of language codes. Wire names follow the
//! REST contract (`_id`, `availableLanguages`, `createdAt`, ...).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::language::{validate_language_code, LanguageCode, SEED_LANGUAGES, SOURCE_LANGUAGE};

/// Language code -> translated text
pub type TranslationMap = BTreeMap<LanguageCode, String>;

/// A stored translation entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    /// Store-assigned identifier, immutable
    #[serde(rename = "_id")]
    pub id: String,
    /// Unique human-readable key
    pub key: String,
    pub translations: TranslationMap,
    /// Codes considered present for this entry, no duplicates
    pub available_languages: Vec<LanguageCode>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Translation {
    /// English source text
    pub fn english(&self) -> &str {
        self.translations
            .get(SOURCE_LANGUAGE)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Case-insensitive substring match on key or English text
    ///
    /// `needle` must already be lowercased.
    pub fn matches_search(&self, needle: &str) -> bool {
        self.key.to_lowercase().contains(needle) || self.english().to_lowercase().contains(needle)
    }

    /// Replace supplied fields wholesale
    pub fn apply_patch(&mut self, patch: TranslationPatch, now: DateTime<Utc>) {
        if let Some(key) = patch.key {
            self.key = key;
        }
        if let Some(translations) = patch.translations {
            self.translations = translations;
        }
        self.updated_at = now;
    }

    /// Set one language value, registering the code once
    pub fn set_language(&mut self, code: &str, value: &str, now: DateTime<Utc>) {
        self.translations.insert(code.to_string(), value.to_string());
        if !self.available_languages.iter().any(|c| c == code) {
            self.available_languages.push(code.to_string());
        }
        self.updated_at = now;
    }
}

/// A validated translation ready for insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTranslation {
    pub key: String,
    pub translations: TranslationMap,
    pub available_languages: Vec<LanguageCode>,
}

impl NewTranslation {
    /// Assemble a seeded entry from English text and enrichment results
    pub fn seeded(
        key: impl Into<String>,
        english: impl Into<String>,
        enriched: impl IntoIterator<Item = (LanguageCode, String)>,
    ) -> Self {
        let mut translations = TranslationMap::new();
        translations.insert(SOURCE_LANGUAGE.to_string(), english.into());
        for (code, text) in enriched {
            translations.entry(code).or_insert(text);
        }

        Self {
            key: key.into(),
            translations,
            available_languages: SEED_LANGUAGES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Fields replaced by an update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationPatch {
    pub key: Option<String>,
    pub translations: Option<TranslationMap>,
}

impl TranslationPatch {
    pub fn is_empty(&self) -> bool {
        self.key.is_none() && self.translations.is_none()
    }
}

/// POST /api/translations body
///
/// Fields are kept as raw JSON so that non-string values are reported as
/// validation errors instead of body rejections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTranslationRequest {
    #[serde(default)]
    pub key: Option<Value>,
    #[serde(default)]
    pub english: Option<Value>,
}

impl CreateTranslationRequest {
    /// Returns the trimmed key and the English text
    pub fn validate(&self) -> Result<(String, String)> {
        let (key, english) = match (&self.key, &self.english) {
            (Some(k), Some(e)) if is_present(k) && is_present(e) => (k, e),
            _ => return Err(Error::validation("Key and English value are required")),
        };

        let key = match key.as_str().map(str::trim) {
            Some(k) if !k.is_empty() => k.to_string(),
            _ => return Err(Error::validation("Invalid key format")),
        };
        let english = match english.as_str() {
            Some(e) if !e.trim().is_empty() => e.to_string(),
            _ => return Err(Error::validation("Invalid English value")),
        };

        Ok((key, english))
    }
}

/// Truthiness of a JSON field: absent, null, false, 0 and "" are missing
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// PUT /api/translations/:id body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTranslationRequest {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub translations: Option<TranslationMap>,
}

impl UpdateTranslationRequest {
    pub fn into_patch(self) -> Result<TranslationPatch> {
        let key = match self.key {
            Some(key) => {
                let key = key.trim();
                if key.is_empty() {
                    return Err(Error::validation("Invalid key format"));
                }
                Some(key.to_string())
            },
            None => None,
        };

        let translations = match self.translations {
            Some(map) => {
                let mut validated = TranslationMap::new();
                for (code, text) in map {
                    validated.insert(validate_language_code(&code)?, text);
                }
                let has_english = validated
                    .get(SOURCE_LANGUAGE)
                    .map(|en| !en.trim().is_empty())
                    .unwrap_or(false);
                if !has_english {
                    return Err(Error::validation("English translation is required"));
                }
                Some(validated)
            },
            None => None,
        };

        Ok(TranslationPatch { key, translations })
    }
}

/// POST /api/translations/:id/languages body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLanguageRequest {
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl AddLanguageRequest {
    /// Returns the validated code and the value
    pub fn validate(&self) -> Result<(LanguageCode, String)> {
        match (self.language_code.as_deref(), self.value.as_deref()) {
            (Some(code), Some(value)) if !code.is_empty() && !value.is_empty() => {
                Ok((validate_language_code(code)?, value.to_string()))
            },
            _ => Err(Error::validation("Language code and value are required")),
        }
    }
}
