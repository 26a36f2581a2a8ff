//! HTTP error mapping
//!
//! Every failure is returned as `{"message": ..., "error": ...}` where
//! `error` carries the underlying detail when there is one.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use transdesk_core::Error;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Domain error on its way out of a handler
#[derive(Debug)]
pub struct ApiError(pub Error);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::Validation(_) | Error::Conflict(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Configuration(_) | Error::ExternalService(_) | Error::Unknown(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    fn body(&self) -> ErrorBody {
        let (message, error) = match &self.0 {
            Error::Validation(msg) | Error::Conflict(msg) | Error::NotFound(msg) => {
                (msg.clone(), None)
            },
            Error::Connection(detail) => (
                "Database connection unavailable".to_string(),
                Some(detail.clone()),
            ),
            Error::Configuration(detail) => (
                "Server configuration error".to_string(),
                Some(detail.clone()),
            ),
            Error::ExternalService(detail) | Error::Unknown(detail) => {
                ("Server error".to_string(), Some(detail.clone()))
            },
        };
        ErrorBody { message, error }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(Error::Validation(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_client_error() {
            tracing::debug!(status = status.as_u16(), error = %self.0, "Request rejected");
        } else {
            tracing::error!(status = status.as_u16(), error = %self.0, "Request failed");
        }
        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError(Error::validation("x")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(Error::duplicate_key()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(Error::translation_not_found()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(Error::Connection("down".into())).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError(Error::unknown("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_body_carries_detail() {
        let body = ApiError(Error::Connection("refused".into())).body();
        assert_eq!(body.message, "Database connection unavailable");
        assert_eq!(body.error.as_deref(), Some("refused"));

        let body = ApiError(Error::translation_not_found()).body();
        assert_eq!(body.message, "Translation not found");
        assert!(body.error.is_none());
    }
}
