//! MongoDB persistence layer for translation entries
//!
//! Provides:
//! - A cached, self-healing database connection (`ConnectionManager`)
//! - The `TranslationStore` trait with MongoDB and in-memory implementations

pub mod connection;
pub mod error;
pub mod memory;
pub mod schema;
pub mod translations;

use std::sync::Arc;

use transdesk_config::{DatabaseBackend, DatabaseConfig};

pub use connection::{ConnectionHandle, ConnectionManager};
pub use error::PersistenceError;
pub use memory::InMemoryTranslationStore;
pub use schema::TranslationDocument;
pub use translations::{MongoTranslationStore, TranslationStore};

/// Build the translation store selected by configuration
///
/// No connection is attempted here; the first `ensure_ready` call connects.
pub fn init(config: &DatabaseConfig) -> Arc<dyn TranslationStore> {
    match config.backend {
        DatabaseBackend::Mongodb => {
            let connections = Arc::new(ConnectionManager::new(config.clone()));
            Arc::new(MongoTranslationStore::new(connections))
        },
        DatabaseBackend::Memory => {
            tracing::warn!("Using in-memory translation store; data is lost on restart");
            Arc::new(InMemoryTranslationStore::new())
        },
    }
}
