//! Centralized constants for the translation service
//!
//! Single source of truth for endpoints, timeouts and database defaults.
//! Settings fall back to these values when nothing else is configured.

/// Service endpoints
pub mod endpoints {
    /// LibreTranslate (primary provider)
    pub const LIBRETRANSLATE_DEFAULT: &str = "https://libretranslate.com";

    /// MyMemory (secondary provider, no API key needed)
    pub const MYMEMORY_DEFAULT: &str = "https://api.mymemory.translated.net";

    /// Bind address for the HTTP server
    pub const SERVER_HOST_DEFAULT: &str = "0.0.0.0";

    /// Port for the HTTP server
    pub const SERVER_PORT_DEFAULT: u16 = 5000;
}

/// Timeouts (in milliseconds unless noted)
pub mod timeouts {
    /// Per-provider translation request timeout (ms)
    pub const TRANSLATION_REQUEST_MS: u64 = 8_000;

    /// MongoDB connect timeout (ms)
    pub const DB_CONNECT_MS: u64 = 10_000;

    /// MongoDB server selection timeout (ms)
    pub const DB_SERVER_SELECTION_MS: u64 = 10_000;

    /// Upper bound for a single database operation (ms)
    pub const DB_SOCKET_MS: u64 = 45_000;
}

/// MongoDB defaults
pub mod database {
    /// Database used when the URI names none
    pub const DEFAULT_DATABASE: &str = "translations";

    /// Collection holding translation documents
    pub const TRANSLATIONS_COLLECTION: &str = "translations";

    /// One logical worker per process
    pub const MAX_POOL_SIZE: u32 = 1;

    pub const MIN_POOL_SIZE: u32 = 0;
}

/// Environment variable names read directly, outside the `TRANSDESK__` prefix
pub mod env {
    pub const MONGODB_URI: &str = "MONGODB_URI";
    pub const HOST: &str = "HOST";
    pub const PORT: &str = "PORT";
    pub const RUNTIME_MODE: &str = "RUNTIME_MODE";

    /// Prefix for structured overrides, e.g. `TRANSDESK__SERVER__PORT`
    pub const PREFIX: &str = "TRANSDESK";
}
