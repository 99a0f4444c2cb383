//! Error types module
//!
//! All errors surfaced by the conversion service are unified under the
//! `AppError` enum. Each variant self-describes its HTTP presentation
//! through the `ErrorMetadata` trait so the API layer can translate errors
//! into responses without matching on variants itself.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "TRANSCODE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details must be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Transcode failed: {0}")]
    Transcode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl AppError {
    /// Get the error type name for logging
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Storage(_) => "Storage",
            AppError::Transcode(_) => "Transcode",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::BadRequest(_) => "BadRequest",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
            AppError::Config(_) => "Config",
        }
    }

    /// Get detailed error information including the source chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        match self {
            AppError::InvalidInput(_) | AppError::BadRequest(_) => 400,
            _ => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Transcode(_) => "TRANSCODE_ERROR",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "INTERNAL_ERROR",
            AppError::Config(_) => "CONFIGURATION_ERROR",
        }
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Storage(_) => "Failed to upload converted files to storage".to_string(),
            AppError::Transcode(_) => "Video conversion failed".to_string(),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
            AppError::Config(_) => "Service misconfigured".to_string(),
        }
    }

    fn is_sensitive(&self) -> bool {
        !matches!(self, AppError::InvalidInput(_) | AppError::BadRequest(_))
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::InvalidInput(_) | AppError::BadRequest(_) => LogLevel::Debug,
            _ => LogLevel::Error,
        }
    }
}
