//! MongoDB document layout for translations
//!
//! Documents written by earlier deployments may carry a `__v` version field;
//! unknown fields are ignored on read.

use std::collections::BTreeMap;

use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use mongodb::options::IndexOptions;
use mongodb::IndexModel;
use serde::{Deserialize, Serialize};

use transdesk_core::{NewTranslation, Translation};

/// Name of the unique index on `key`
pub const KEY_INDEX_NAME: &str = "key_unique";

/// A translation as stored in MongoDB
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub key: String,
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
    #[serde(default)]
    pub available_languages: Vec<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl TranslationDocument {
    /// Fresh document with a new id and both timestamps set to `now`
    pub fn from_new(new: NewTranslation, now: DateTime<Utc>) -> Self {
        Self {
            id: ObjectId::new(),
            key: new.key,
            translations: new.translations,
            available_languages: new.available_languages,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<TranslationDocument> for Translation {
    fn from(doc: TranslationDocument) -> Self {
        Translation {
            id: doc.id.to_hex(),
            key: doc.key,
            translations: doc.translations,
            available_languages: doc.available_languages,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// Unique index enforcing one document per key
pub fn key_index() -> IndexModel {
    IndexModel::builder()
        .keys(bson::doc! { "key": 1 })
        .options(
            IndexOptions::builder()
                .name(KEY_INDEX_NAME.to_string())
                .unique(true)
                .build(),
        )
        .build()
}

/// Current time truncated to the millisecond precision MongoDB stores
pub fn now() -> DateTime<Utc> {
    bson::DateTime::now().to_chrono()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_field_names() {
        let new = NewTranslation::seeded("greet", "Hello", Vec::new());
        let doc = TranslationDocument::from_new(new, now());
        let bson_doc = bson::to_document(&doc).unwrap();

        assert!(bson_doc.get_object_id("_id").is_ok());
        assert_eq!(bson_doc.get_str("key").unwrap(), "greet");
        assert!(bson_doc.get_datetime("createdAt").is_ok());
        assert!(bson_doc.get_datetime("updatedAt").is_ok());
        assert_eq!(bson_doc.get_array("availableLanguages").unwrap().len(), 4);
        assert_eq!(
            bson_doc.get_document("translations").unwrap().get_str("en").unwrap(),
            "Hello"
        );
    }

    #[test]
    fn test_reads_legacy_document() {
        let oid = ObjectId::new();
        let raw = bson::doc! {
            "_id": oid,
            "key": "greet",
            "translations": { "en": "Hello", "hi": "" },
            "availableLanguages": ["en", "hi", "bn", "es"],
            "createdAt": bson::DateTime::now(),
            "updatedAt": bson::DateTime::now(),
            "__v": 0,
        };
        let doc: TranslationDocument = bson::from_document(raw).unwrap();
        let translation: Translation = doc.into();
        assert_eq!(translation.id, oid.to_hex());
        assert_eq!(translation.english(), "Hello");
    }

    #[test]
    fn test_key_index_is_unique() {
        let index = key_index();
        let options = index.options.unwrap();
        assert_eq!(options.unique, Some(true));
        assert_eq!(options.name.as_deref(), Some(KEY_INDEX_NAME));
    }
}
