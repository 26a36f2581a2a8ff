//! Configuration for the translation management service
//!
//! Settings are layered: built-in defaults, then an optional config file,
//! then `TRANSDESK__*` environment variables, then the conventional
//! deployment variables (`MONGODB_URI`, `HOST`, `PORT`, `RUNTIME_MODE`).

pub mod constants;
pub mod settings;

pub use settings::{
    ConfigError, DatabaseBackend, DatabaseConfig, RuntimeMode, ServerConfig, Settings,
    TranslationServiceConfig,
};
