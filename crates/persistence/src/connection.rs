//! Cached MongoDB connection
//!
//! One `ConnectionManager` lives for the whole process and is shared by
//! `Arc`. The first caller connects; later callers reuse the cached handle
//! for as long as it stays ready. A handle goes stale when an operation sees
//! a network-class failure, and the next `ensure_connected` call closes it
//! and reconnects.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bson::doc;
use chrono::{DateTime, Utc};
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use transdesk_config::DatabaseConfig;

use crate::error::PersistenceError;

/// Upper bound on closing a stale client
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Cheap, cloneable handle to an established connection
#[derive(Clone)]
pub struct ConnectionHandle {
    inner: Arc<HandleInner>,
}

struct HandleInner {
    client: Client,
    database: Database,
    host: String,
    connected_at: DateTime<Utc>,
    ready: AtomicBool,
}

impl ConnectionHandle {
    fn new(client: Client, database: Database, host: String) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                client,
                database,
                host,
                connected_at: Utc::now(),
                ready: AtomicBool::new(true),
            }),
        }
    }

    /// Handle around a client that has not talked to any server yet
    #[cfg(test)]
    pub(crate) async fn unconnected(uri: &str) -> Self {
        let options = ClientOptions::parse(uri).await.unwrap();
        let host = options.hosts[0].to_string();
        let client = Client::with_options(options).unwrap();
        let database = client.database("transdesk_test");
        Self::new(client, database, host)
    }

    pub fn database(&self) -> &Database {
        &self.inner.database
    }

    pub fn host(&self) -> &str {
        &self.inner.host
    }

    pub fn is_ready(&self) -> bool {
        self.inner.ready.load(Ordering::Acquire)
    }

    /// Flag the handle so the next `ensure_connected` reconnects
    pub fn mark_stale(&self) {
        if self.inner.ready.swap(false, Ordering::AcqRel) {
            warn!(host = %self.inner.host, "MongoDB connection marked stale");
        }
    }

    async fn close(self) {
        self.inner.ready.store(false, Ordering::Release);
        let client = self.inner.client.clone();
        if tokio::time::timeout(CLOSE_TIMEOUT, client.shutdown())
            .await
            .is_err()
        {
            warn!(host = %self.inner.host, "Timed out closing stale MongoDB connection");
        }
    }
}

impl std::fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("host", &self.inner.host)
            .field("database", &self.inner.database.name())
            .field("ready", &self.is_ready())
            .finish()
    }
}

/// Process-wide connection cache
pub struct ConnectionManager {
    config: DatabaseConfig,
    cached: Mutex<Option<ConnectionHandle>>,
}

impl ConnectionManager {
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            cached: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Return a ready connection, connecting or reconnecting as needed
    ///
    /// Fails with `Configuration` when no URI is configured and with
    /// `Connection` when the server cannot be reached. A failed attempt
    /// leaves the cache empty.
    pub async fn ensure_connected(&self) -> Result<ConnectionHandle, PersistenceError> {
        let uri = self.config.uri.as_deref().ok_or_else(|| {
            error!("MONGODB_URI is not defined in environment variables");
            PersistenceError::Configuration(
                "MONGODB_URI is not defined in environment variables".to_string(),
            )
        })?;

        let mut cached = self.cached.lock().await;

        if let Some(handle) = cached.as_ref() {
            if handle.is_ready() {
                debug!(
                    connected_at = %handle.inner.connected_at,
                    "Using cached MongoDB connection"
                );
                return Ok(handle.clone());
            }
        }

        if let Some(stale) = cached.take() {
            warn!(host = %stale.host(), "Closing stale MongoDB connection");
            stale.close().await;
        }

        info!(uri = %redact_uri(uri), "Connecting to MongoDB");
        match self.connect(uri).await {
            Ok(handle) => {
                info!(
                    host = %handle.host(),
                    database = %handle.database().name(),
                    "MongoDB connected"
                );
                *cached = Some(handle.clone());
                Ok(handle)
            },
            Err(e) => {
                error!(error = %e, "MongoDB connection error");
                Err(e)
            },
        }
    }

    async fn connect(&self, uri: &str) -> Result<ConnectionHandle, PersistenceError> {
        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|e| PersistenceError::Connection(format!("invalid MongoDB URI: {}", e)))?;

        options.app_name = Some("transdesk".to_string());
        options.connect_timeout = Some(self.config.connect_timeout());
        options.server_selection_timeout = Some(self.config.server_selection_timeout());
        options.max_pool_size = Some(self.config.max_pool_size);
        options.min_pool_size = Some(self.config.min_pool_size);

        let host = options
            .hosts
            .first()
            .map(|h| h.to_string())
            .unwrap_or_default();
        let database_name = options
            .default_database
            .clone()
            .unwrap_or_else(|| self.config.name.clone());

        let client = Client::with_options(options)
            .map_err(|e| PersistenceError::Connection(e.to_string()))?;
        let database = client.database(&database_name);

        let ping = database.run_command(doc! { "ping": 1 }, None);
        match tokio::time::timeout(self.config.socket_timeout(), ping).await {
            Ok(Ok(_)) => {},
            Ok(Err(e)) => return Err(PersistenceError::Connection(e.to_string())),
            Err(_) => {
                return Err(PersistenceError::Connection(
                    "timed out waiting for MongoDB ping".to_string(),
                ))
            },
        }

        Ok(ConnectionHandle::new(client, database, host))
    }
}

/// Strip credentials from a connection URI for logging
fn redact_uri(uri: &str) -> String {
    match (uri.find("://"), uri.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***@{}", &uri[..scheme_end], &uri[at + 1..])
        },
        _ => uri.to_string(),
    }
}
