//! Translation store
//!
//! `TranslationStore` is the seam between the API and storage. The MongoDB
//! implementation keeps every operation to a single document so that the
//! server's per-document atomicity is the only consistency guarantee needed.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::Collection;
use tokio::sync::OnceCell;

use transdesk_config::constants::database::TRANSLATIONS_COLLECTION;
use transdesk_core::{LanguageCode, NewTranslation, Translation, TranslationPatch};

use crate::connection::{ConnectionHandle, ConnectionManager};
use crate::error::PersistenceError;
use crate::schema::{self, TranslationDocument};

/// MongoDB duplicate key error code
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Storage for translation entries
#[async_trait]
pub trait TranslationStore: Send + Sync {
    /// Make sure the backing store is reachable
    async fn ensure_ready(&self) -> Result<(), PersistenceError>;

    /// Insert a new entry; a taken key is `DuplicateKey`
    async fn insert(&self, new: NewTranslation) -> Result<Translation, PersistenceError>;

    /// Lookup by id; malformed ids are treated as unknown
    async fn find_by_id(&self, id: &str) -> Result<Option<Translation>, PersistenceError>;

    async fn find_by_key(&self, key: &str) -> Result<Option<Translation>, PersistenceError>;

    /// All entries, newest first, optionally filtered by a case-insensitive
    /// substring of the key or English text
    async fn list(&self, search: Option<&str>) -> Result<Vec<Translation>, PersistenceError>;

    /// Replace the supplied fields wholesale; `None` if the id is unknown
    async fn update(
        &self,
        id: &str,
        patch: TranslationPatch,
    ) -> Result<Option<Translation>, PersistenceError>;

    /// Set one language value and register the code once; `None` if the id
    /// is unknown
    async fn add_language(
        &self,
        id: &str,
        code: &LanguageCode,
        value: &str,
    ) -> Result<Option<Translation>, PersistenceError>;

    /// Remove an entry; `false` if the id is unknown
    async fn delete(&self, id: &str) -> Result<bool, PersistenceError>;

    /// Backend name for health reporting
    fn backend(&self) -> &'static str;
}

/// MongoDB-backed translation store
pub struct MongoTranslationStore {
    connections: Arc<ConnectionManager>,
    /// Set once the unique key index exists or cannot exist
    key_index: OnceCell<()>,
}

impl MongoTranslationStore {
    pub fn new(connections: Arc<ConnectionManager>) -> Self {
        Self {
            connections,
            key_index: OnceCell::new(),
        }
    }

    async fn collection(
        &self,
    ) -> Result<(ConnectionHandle, Collection<TranslationDocument>), PersistenceError> {
        let handle = self.connections.ensure_connected().await?;
        let collection = handle.database().collection(TRANSLATIONS_COLLECTION);
        Ok((handle, collection))
    }

    /// Run one driver operation under the socket timeout, classifying errors
    async fn run<T, F>(&self, handle: &ConnectionHandle, op: F) -> Result<T, PersistenceError>
    where
        F: Future<Output = mongodb::error::Result<T>>,
    {
        let deadline = self.connections.config().socket_timeout();
        match tokio::time::timeout(deadline, op).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(classify(handle, e)),
            Err(_) => {
                handle.mark_stale();
                Err(PersistenceError::Connection(
                    "database operation timed out".to_string(),
                ))
            },
        }
    }
}

/// Map a driver error onto the persistence taxonomy
fn classify(handle: &ConnectionHandle, err: mongodb::error::Error) -> PersistenceError {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY_CODE => {
            PersistenceError::DuplicateKey(we.message.clone())
        },
        ErrorKind::Command(ce) if ce.code == DUPLICATE_KEY_CODE => {
            PersistenceError::DuplicateKey(ce.message.clone())
        },
        ErrorKind::Io(_)
        | ErrorKind::ServerSelection { .. }
        | ErrorKind::ConnectionPoolCleared { .. } => {
            handle.mark_stale();
            PersistenceError::Connection(err.to_string())
        },
        _ => PersistenceError::Database(err.to_string()),
    }
}

/// Filter for an id string; `None` when the string is not an ObjectId
fn id_filter(id: &str) -> Option<Document> {
    ObjectId::parse_str(id).ok().map(|oid| doc! { "_id": oid })
}

/// `$or` regex filter over key and English text
pub fn search_filter(term: &str) -> Document {
    let pattern = regex::escape(term);
    doc! {
        "$or": [
            { "key": { "$regex": pattern.as_str(), "$options": "i" } },
            { "translations.en": { "$regex": pattern.as_str(), "$options": "i" } },
        ]
    }
}

/// `$set` document replacing the supplied fields wholesale
pub fn update_document(
    patch: TranslationPatch,
    now: DateTime<Utc>,
) -> Result<Document, PersistenceError> {
    let mut set = doc! { "updatedAt": bson::DateTime::from_chrono(now) };
    if let Some(key) = patch.key {
        set.insert("key", key);
    }
    if let Some(translations) = patch.translations {
        set.insert("translations", bson::to_bson(&translations)?);
    }
    Ok(doc! { "$set": set })
}

/// Set one language value and register its code at most once
pub fn add_language_document(code: &LanguageCode, value: &str, now: DateTime<Utc>) -> Document {
    let mut set = Document::new();
    set.insert(format!("translations.{}", code), value);
    set.insert("updatedAt", bson::DateTime::from_chrono(now));
    doc! {
        "$set": set,
        "$addToSet": { "availableLanguages": code.as_str() },
    }
}

/// Outcome of building the unique key index
///
/// Duplicate keys already in the collection block the index for good, so
/// that case is logged and settled. Any other failure is returned and the
/// next call retries.
fn key_index_outcome(result: Result<(), PersistenceError>) -> Result<(), PersistenceError> {
    match result {
        Err(PersistenceError::DuplicateKey(detail)) => {
            tracing::error!(
                error = %detail,
                "Duplicate keys prevent the unique index, key uniqueness is not enforced"
            );
            Ok(())
        },
        other => other,
    }
}

fn after_update() -> FindOneAndUpdateOptions {
    FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build()
}

#[async_trait]
impl TranslationStore for MongoTranslationStore {
    async fn ensure_ready(&self) -> Result<(), PersistenceError> {
        let (handle, collection) = self.collection().await?;

        self.key_index
            .get_or_try_init(|| async {
                let built = self
                    .run(&handle, collection.create_index(schema::key_index(), None))
                    .await
                    .map(|_| ());
                key_index_outcome(built)
            })
            .await?;
        Ok(())
    }

    async fn insert(&self, new: NewTranslation) -> Result<Translation, PersistenceError> {
        let (handle, collection) = self.collection().await?;
        let document = TranslationDocument::from_new(new, schema::now());

        self.run(&handle, collection.insert_one(&document, None))
            .await?;
        tracing::debug!(id = %document.id, key = %document.key, "Inserted translation");
        Ok(document.into())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Translation>, PersistenceError> {
        let Some(filter) = id_filter(id) else {
            return Ok(None);
        };
        let (handle, collection) = self.collection().await?;
        let found = self.run(&handle, collection.find_one(filter, None)).await?;
        Ok(found.map(Into::into))
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<Translation>, PersistenceError> {
        let (handle, collection) = self.collection().await?;
        let found = self
            .run(&handle, collection.find_one(doc! { "key": key }, None))
            .await?;
        Ok(found.map(Into::into))
    }

    async fn list(&self, search: Option<&str>) -> Result<Vec<Translation>, PersistenceError> {
        let (handle, collection) = self.collection().await?;
        let filter = search.map(search_filter).unwrap_or_default();
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .build();

        let documents: Vec<TranslationDocument> = self
            .run(&handle, async {
                collection
                    .find(filter, options)
                    .await?
                    .try_collect::<Vec<_>>()
                    .await
            })
            .await?;
        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn update(
        &self,
        id: &str,
        patch: TranslationPatch,
    ) -> Result<Option<Translation>, PersistenceError> {
        let Some(filter) = id_filter(id) else {
            return Ok(None);
        };
        let (handle, collection) = self.collection().await?;

        let update = update_document(patch, schema::now())?;

        let updated = self
            .run(
                &handle,
                collection.find_one_and_update(filter, update, after_update()),
            )
            .await?;
        Ok(updated.map(Into::into))
    }

    async fn add_language(
        &self,
        id: &str,
        code: &LanguageCode,
        value: &str,
    ) -> Result<Option<Translation>, PersistenceError> {
        let Some(filter) = id_filter(id) else {
            return Ok(None);
        };
        let (handle, collection) = self.collection().await?;

        let update = add_language_document(code, value, schema::now());

        let updated = self
            .run(
                &handle,
                collection.find_one_and_update(filter, update, after_update()),
            )
            .await?;
        Ok(updated.map(Into::into))
    }

    async fn delete(&self, id: &str) -> Result<bool, PersistenceError> {
        let Some(filter) = id_filter(id) else {
            return Ok(false);
        };
        let (handle, collection) = self.collection().await?;
        let result = self.run(&handle, collection.delete_one(filter, None)).await?;
        Ok(result.deleted_count > 0)
    }

    fn backend(&self) -> &'static str {
        "mongodb"
    }
}
