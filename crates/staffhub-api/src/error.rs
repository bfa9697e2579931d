//! Maps domain `AppError` to HTTP responses.

use std::sync::OnceLock;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use staffhub_core::error::{AppError, ErrorKind};

static EXPOSE_INTERNAL_ERRORS: OnceLock<bool> = OnceLock::new();

/// Message sent in place of server-side error details when they are hidden.
pub const GENERIC_INTERNAL_MESSAGE: &str = "Internal server error";

/// Decide once, at startup, whether 5xx responses carry the real error
/// message. Later calls are ignored.
pub fn configure_error_exposure(expose: bool) {
    let _ = EXPOSE_INTERNAL_ERRORS.set(expose);
}

fn expose_internal_errors() -> bool {
    EXPOSE_INTERNAL_ERRORS.get().copied().unwrap_or(true)
}

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Handler error: an [`AppError`] that knows how to become a response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let reason = errs
                    .iter()
                    .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| "is invalid".to_string());
                format!("{field}: {reason}")
            })
            .collect();
        Self(AppError::validation(fields.join("; ")))
    }
}

/// Status code and error code for an error kind.
pub fn status_for(kind: ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        ErrorKind::Authentication => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        ErrorKind::Authorization => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, error_code) = status_for(err.kind);

        let message = if err.kind.is_server_error() {
            tracing::error!(
                kind = %err.kind,
                error = %err.message,
                source = ?err.source,
                "Request failed with server error"
            );
            if expose_internal_errors() {
                err.message
            } else {
                GENERIC_INTERNAL_MESSAGE.to_string()
            }
        } else {
            err.message
        };

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorKind::Validation).0, StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::Authentication).0, StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(ErrorKind::Authorization).0, StatusCode::FORBIDDEN);
        assert_eq!(status_for(ErrorKind::NotFound).0, StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::Conflict).0, StatusCode::CONFLICT);
        assert_eq!(
            status_for(ErrorKind::Database).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(ErrorKind::ExternalService).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_conflict_response_status() {
        let response =
            ApiError::from(AppError::conflict("Transfer request has already been processed"))
                .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
