//! Process-local translation store
//!
//! Same contract as the MongoDB store, including key uniqueness and
//! newest-first ordering. Used by tests and by development runs without a
//! database. Availability can be switched off to simulate an outage.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bson::oid::ObjectId;
use parking_lot::RwLock;

use transdesk_core::{LanguageCode, NewTranslation, Translation, TranslationPatch};

use crate::error::PersistenceError;
use crate::schema;
use crate::translations::TranslationStore;

/// In-memory translation store
pub struct InMemoryTranslationStore {
    /// Insertion order
    entries: RwLock<Vec<Translation>>,
    available: AtomicBool,
}

impl InMemoryTranslationStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the database going away (or coming back)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn check_available(&self) -> Result<(), PersistenceError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(PersistenceError::Connection(
                "in-memory store marked unavailable".to_string(),
            ))
        }
    }
}

impl Default for InMemoryTranslationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslationStore for InMemoryTranslationStore {
    async fn ensure_ready(&self) -> Result<(), PersistenceError> {
        self.check_available()
    }

    async fn insert(&self, new: NewTranslation) -> Result<Translation, PersistenceError> {
        self.check_available()?;
        let mut entries = self.entries.write();
        if entries.iter().any(|t| t.key == new.key) {
            return Err(PersistenceError::DuplicateKey(new.key));
        }

        let now = schema::now();
        let translation = Translation {
            id: ObjectId::new().to_hex(),
            key: new.key,
            translations: new.translations,
            available_languages: new.available_languages,
            created_at: now,
            updated_at: now,
        };
        entries.push(translation.clone());
        Ok(translation)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Translation>, PersistenceError> {
        self.check_available()?;
        Ok(self.entries.read().iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<Translation>, PersistenceError> {
        self.check_available()?;
        Ok(self.entries.read().iter().find(|t| t.key == key).cloned())
    }

    async fn list(&self, search: Option<&str>) -> Result<Vec<Translation>, PersistenceError> {
        self.check_available()?;
        let needle = search.map(str::to_lowercase);

        let mut found: Vec<Translation> = self
            .entries
            .read()
            .iter()
            .rev()
            .filter(|t| needle.as_deref().map_or(true, |n| t.matches_search(n)))
            .cloned()
            .collect();
        // Stable: equal timestamps keep newest-inserted first
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn update(
        &self,
        id: &str,
        patch: TranslationPatch,
    ) -> Result<Option<Translation>, PersistenceError> {
        self.check_available()?;
        let mut entries = self.entries.write();

        if let Some(key) = patch.key.as_deref() {
            if entries.iter().any(|t| t.key == key && t.id != id) {
                return Err(PersistenceError::DuplicateKey(key.to_string()));
            }
        }

        Ok(entries.iter_mut().find(|t| t.id == id).map(|t| {
            t.apply_patch(patch, schema::now());
            t.clone()
        }))
    }

    async fn add_language(
        &self,
        id: &str,
        code: &LanguageCode,
        value: &str,
    ) -> Result<Option<Translation>, PersistenceError> {
        self.check_available()?;
        Ok(self
            .entries
            .write()
            .iter_mut()
            .find(|t| t.id == id)
            .map(|t| {
                t.set_language(code, value, schema::now());
                t.clone()
            }))
    }

    async fn delete(&self, id: &str) -> Result<bool, PersistenceError> {
        self.check_available()?;
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|t| t.id != id);
        Ok(entries.len() < before)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use transdesk_core::TranslationMap;

    fn seeded(key: &str, english: &str) -> NewTranslation {
        NewTranslation::seeded(key, english, Vec::new())
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamps() {
        let store = InMemoryTranslationStore::new();
        let t = store.insert(seeded("greet", "Hello")).await.unwrap();
        assert_eq!(t.id.len(), 24);
        assert_eq!(t.created_at, t.updated_at);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_key_rejected() {
        let store = InMemoryTranslationStore::new();
        let original = store.insert(seeded("greet", "Hello")).await.unwrap();

        let result = store.insert(seeded("greet", "Hi there")).await;
        assert!(matches!(result, Err(PersistenceError::DuplicateKey(_))));

        let stored = store.find_by_id(&original.id).await.unwrap().unwrap();
        assert_eq!(stored, original);
    }

    #[tokio::test]
    async fn test_list_newest_first_with_search() {
        let store = InMemoryTranslationStore::new();
        store.insert(seeded("greet", "Hello")).await.unwrap();
        store.insert(seeded("farewell", "Goodbye")).await.unwrap();
        store.insert(seeded("welcome_banner", "Welcome aboard")).await.unwrap();

        let all = store.list(None).await.unwrap();
        let keys: Vec<_> = all.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, vec!["welcome_banner", "farewell", "greet"]);

        let found = store.list(Some("GOOD")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].key, "farewell");

        let found = store.list(Some("e_b")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].key, "welcome_banner");
    }

    #[tokio::test]
    async fn test_update_key_collision() {
        let store = InMemoryTranslationStore::new();
        store.insert(seeded("greet", "Hello")).await.unwrap();
        let other = store.insert(seeded("farewell", "Goodbye")).await.unwrap();

        let result = store
            .update(
                &other.id,
                TranslationPatch {
                    key: Some("greet".into()),
                    translations: None,
                },
            )
            .await;
        assert!(matches!(result, Err(PersistenceError::DuplicateKey(_))));

        // Renaming to its own key is fine
        let renamed = store
            .update(
                &other.id,
                TranslationPatch {
                    key: Some("farewell".into()),
                    translations: None,
                },
            )
            .await
            .unwrap();
        assert!(renamed.is_some());
    }

    #[tokio::test]
    async fn test_update_replaces_translations() {
        let store = InMemoryTranslationStore::new();
        let t = store.insert(seeded("greet", "Hello")).await.unwrap();

        let mut map = TranslationMap::new();
        map.insert("en".into(), "Hi".into());
        let updated = store
            .update(
                &t.id,
                TranslationPatch {
                    key: None,
                    translations: Some(map),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.translations.len(), 1);
        assert!(updated.updated_at >= t.updated_at);
    }

    #[tokio::test]
    async fn test_unknown_ids() {
        let store = InMemoryTranslationStore::new();
        assert!(store.find_by_id("missing").await.unwrap().is_none());
        assert!(store
            .update("missing", TranslationPatch::default())
            .await
            .unwrap()
            .is_none());
        assert!(store
            .add_language("missing", &"it".to_string(), "Ciao")
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete("missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_unavailable_store() {
        let store = InMemoryTranslationStore::new();
        store.set_available(false);
        assert!(matches!(
            store.ensure_ready().await,
            Err(PersistenceError::Connection(_))
        ));
        assert!(store.list(None).await.is_err());

        store.set_available(true);
        assert!(store.ensure_ready().await.is_ok());
    }
}
