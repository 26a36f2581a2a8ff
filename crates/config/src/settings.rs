//! Layered settings
//!
//! Load order, later sources win:
//! 1. Built-in defaults from [`crate::constants`]
//! 2. `config/transdesk.{toml,yaml,json}` or an explicit file
//! 3. `TRANSDESK__SECTION__FIELD` environment variables
//! 4. `MONGODB_URI`, `HOST`, `PORT`, `RUNTIME_MODE`

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{database, endpoints, env, timeouts};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for transdesk_core::Error {
    fn from(err: ConfigError) -> Self {
        transdesk_core::Error::Configuration(err.to_string())
    }
}

/// Runtime mode flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    #[default]
    Development,
    Production,
}

impl RuntimeMode {
    pub fn is_production(&self) -> bool {
        matches!(self, RuntimeMode::Production)
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Which translation store backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    #[default]
    Mongodb,
    /// Process-local store, for development without MongoDB
    Memory,
}

/// MongoDB settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    /// Connection URI; required for the MongoDB backend
    #[serde(default)]
    pub uri: Option<String>,
    /// Database name used when the URI names none
    pub name: String,
    pub connect_timeout_ms: u64,
    pub server_selection_timeout_ms: u64,
    pub socket_timeout_ms: u64,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
}

impl DatabaseConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn server_selection_timeout(&self) -> Duration {
        Duration::from_millis(self.server_selection_timeout_ms)
    }

    pub fn socket_timeout(&self) -> Duration {
        Duration::from_millis(self.socket_timeout_ms)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::Mongodb,
            uri: None,
            name: database::DEFAULT_DATABASE.to_string(),
            connect_timeout_ms: timeouts::DB_CONNECT_MS,
            server_selection_timeout_ms: timeouts::DB_SERVER_SELECTION_MS,
            socket_timeout_ms: timeouts::DB_SOCKET_MS,
            max_pool_size: database::MAX_POOL_SIZE,
            min_pool_size: database::MIN_POOL_SIZE,
        }
    }
}

/// External translation provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationServiceConfig {
    /// LibreTranslate base URL
    pub libretranslate_url: String,
    /// LibreTranslate API key, empty for the public instance
    #[serde(default)]
    pub libretranslate_api_key: String,
    /// MyMemory base URL
    pub mymemory_url: String,
    /// Per-provider request timeout
    pub timeout_ms: u64,
}

impl TranslationServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for TranslationServiceConfig {
    fn default() -> Self {
        Self {
            libretranslate_url: endpoints::LIBRETRANSLATE_DEFAULT.to_string(),
            libretranslate_api_key: String::new(),
            mymemory_url: endpoints::MYMEMORY_DEFAULT.to_string(),
            timeout_ms: timeouts::TRANSLATION_REQUEST_MS,
        }
    }
}

/// Complete service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub runtime_mode: RuntimeMode,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub translation: TranslationServiceConfig,
}

impl Settings {
    /// Load from the default file location and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env(None, std::env::vars().collect())
    }

    /// Load against a supplied environment map
    pub fn load_with_env(
        path: Option<&Path>,
        vars: HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let defaults = DatabaseConfig::default();
        let translation = TranslationServiceConfig::default();

        let mut builder = Config::builder()
            .set_default("runtime_mode", "development")?
            .set_default("server.host", endpoints::SERVER_HOST_DEFAULT)?
            .set_default("server.port", endpoints::SERVER_PORT_DEFAULT as i64)?
            .set_default("database.backend", "mongodb")?
            .set_default("database.name", defaults.name)?
            .set_default("database.connect_timeout_ms", defaults.connect_timeout_ms)?
            .set_default(
                "database.server_selection_timeout_ms",
                defaults.server_selection_timeout_ms,
            )?
            .set_default("database.socket_timeout_ms", defaults.socket_timeout_ms)?
            .set_default("database.max_pool_size", defaults.max_pool_size as i64)?
            .set_default("database.min_pool_size", defaults.min_pool_size as i64)?
            .set_default("translation.libretranslate_url", translation.libretranslate_url)?
            .set_default("translation.libretranslate_api_key", "")?
            .set_default("translation.mymemory_url", translation.mymemory_url)?
            .set_default("translation.timeout_ms", translation.timeout_ms)?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("config/transdesk").required(false)),
        };

        builder = builder
            .add_source(
                Environment::with_prefix(env::PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars.clone().into_iter().collect())),
            )
            .set_override_option("database.uri", non_empty(&vars, env::MONGODB_URI))?
            .set_override_option("server.host", non_empty(&vars, env::HOST))?
            .set_override_option("server.port", non_empty(&vars, env::PORT))?
            .set_override_option(
                "runtime_mode",
                non_empty(&vars, env::RUNTIME_MODE).map(|m| m.to_lowercase()),
            )?;

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Sanity checks beyond what deserialization enforces
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_pool_size == 0 {
            return Err(ConfigError::Invalid(
                "database.max_pool_size must be at least 1".to_string(),
            ));
        }
        if self.database.min_pool_size > self.database.max_pool_size {
            return Err(ConfigError::Invalid(
                "database.min_pool_size exceeds database.max_pool_size".to_string(),
            ));
        }
        if self.translation.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "translation.timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// `host:port` for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn non_empty(vars: &HashMap<String, String>, name: &str) -> Option<String> {
    vars.get(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
