//! REST API server for translation management
//!
//! Routes:
//! - `GET /` service banner
//! - `GET /api/health` liveness and database status
//! - `/api/translations` create, list/search, fetch, update, delete,
//!   add language

pub mod error;
pub mod http;
pub mod service;
pub mod state;
pub mod telemetry;

pub use error::ApiError;
pub use http::create_router;
pub use service::TranslationService;
pub use state::AppState;
