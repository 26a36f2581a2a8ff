//! Router and handlers

use axum::extract::{FromRequest, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use transdesk_core::{
    AddLanguageRequest, CreateTranslationRequest, Translation, UpdateTranslationRequest,
};

use crate::error::ApiError;
use crate::state::AppState;

/// JSON body extractor that reports malformed bodies as validation errors
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub search: Option<String>,
}

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let translations = Router::new()
        .route("/", post(create_translation).get(list_translations))
        .route(
            "/:id",
            get(get_translation)
                .put(update_translation)
                .delete(delete_translation),
        )
        .route("/:id/languages", post(add_language));

    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .nest("/api/translations", translations)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// GET /
async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Translation Management Tool API" }))
}

/// GET /api/health
async fn health(State(state): State<AppState>) -> Response {
    match state.translations.health().await {
        Ok(backend) => Json(json!({
            "status": "ok",
            "database": "connected",
            "backend": backend,
        }))
        .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "error",
                    "database": "disconnected",
                    "message": "Database connection unavailable",
                    "error": e.to_string(),
                })),
            )
                .into_response()
        },
    }
}

/// POST /api/translations
async fn create_translation(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateTranslationRequest>,
) -> Result<(StatusCode, Json<Translation>), ApiError> {
    let created = state.translations.create(&request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/translations?search=
async fn list_translations(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Translation>>, ApiError> {
    let translations = state.translations.list(params.search.as_deref()).await?;
    Ok(Json(translations))
}

/// GET /api/translations/:id
async fn get_translation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Translation>, ApiError> {
    Ok(Json(state.translations.get(&id).await?))
}

/// PUT /api/translations/:id
async fn update_translation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateTranslationRequest>,
) -> Result<Json<Translation>, ApiError> {
    Ok(Json(state.translations.update(&id, request).await?))
}

/// DELETE /api/translations/:id
async fn delete_translation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.translations.delete(&id).await?;
    Ok(Json(json!({ "message": "Translation deleted successfully" })))
}

/// POST /api/translations/:id/languages
async fn add_language(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<AddLanguageRequest>,
) -> Result<Json<Translation>, ApiError> {
    Ok(Json(state.translations.add_language(&id, &request).await?))
}
