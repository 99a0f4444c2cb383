//! HTTP error response conversion
//!
//! This module provides HTTP-specific error response conversion for AppError.
//!
//! **Handler pattern:** Return `Result<impl IntoResponse, HttpAppError>`.
//! Use `AppError` (or types with a `From` impl below) for errors so they
//! render consistently (status, body shape, logging).
//!
//! Response body contract: client errors (4xx) serialize as
//! `{"error": <message>}`; server errors (5xx) serialize as
//! `{"success": false, "error": <message>}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use vodworks_core::{AppError, ErrorMetadata, LogLevel};
use vodworks_processing::ConversionError;
use vodworks_storage::StorageError;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Present (and false) on server-side failures only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    pub error: String,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from vodworks-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

// Convert domain errors to HttpAppError (avoids orphan rule: we impl for local HttpAppError)

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::ConfigError(msg) => AppError::Config(msg),
            StorageError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
            other => AppError::Storage(other.to_string()),
        };
        HttpAppError(app)
    }
}

impl From<ConversionError> for HttpAppError {
    fn from(err: ConversionError) -> Self {
        let app = match err {
            ConversionError::Transcode(source) => AppError::Transcode(source.to_string()),
            ConversionError::Publish(source) => AppError::Storage(format!("{:#}", source)),
        };
        HttpAppError(app)
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, code, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, code, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error.detailed_message(),
                error_type,
                code,
                "Request failed"
            );
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Sensitive errors only ever expose their client-safe summary;
        // the full detail went to the server log above.
        let body = ErrorResponse {
            success: status.is_server_error().then_some(false),
            error: app_error.client_message(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_body_shape() {
        let response = ErrorResponse {
            success: None,
            error: "No video file uploaded".to_string(),
        };
        let json = serde_json::to_value(&response).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"error": "No video file uploaded"})
        );
    }

    #[test]
    fn test_server_error_body_shape() {
        let response = ErrorResponse {
            success: Some(false),
            error: "Video conversion failed".to_string(),
        };
        let json = serde_json::to_value(&response).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": "Video conversion failed"})
        );
    }

    #[test]
    fn test_from_storage_error_invalid_key() {
        let HttpAppError(app) = StorageError::InvalidKey("bad key".to_string()).into();
        assert!(matches!(app, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_from_storage_error_upload_failed() {
        let HttpAppError(app) = StorageError::UploadFailed("boom".to_string()).into();
        assert!(matches!(app, AppError::Storage(_)));
    }

    #[test]
    fn test_from_conversion_error_variants() {
        let HttpAppError(publish) =
            ConversionError::Publish(anyhow::anyhow!("store down")).into();
        assert!(matches!(publish, AppError::Storage(_)));
    }
}
