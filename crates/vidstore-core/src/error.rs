//! Error types module
//!
//! Unified error type for the service. Each variant carries enough metadata
//! to render the corresponding HTTP response (status and machine-readable
//! code) and to pick a log severity.

use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code for this error.
    ///
    /// `PayloadTooLarge` maps to 422, which is the status the upload endpoint
    /// has always returned for oversized files.
    pub fn http_status_code(&self) -> u16 {
        match self {
            AppError::BadRequest(_) => 400,
            AppError::UnsupportedMediaType(_) => 415,
            AppError::PayloadTooLarge(_) => 422,
            AppError::NotFound(_) => 404,
            AppError::Storage(_) => 500,
            AppError::Database(_) => 500,
            AppError::Internal(_) => 500,
        }
    }

    /// Machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::UnsupportedMediaType(_) => "UNSUPPORTED_MEDIA_TYPE",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Client-facing message. Server faults get a generic message; details
    /// stay in the logs.
    pub fn client_message(&self) -> String {
        match self {
            AppError::BadRequest(msg) => msg.clone(),
            AppError::UnsupportedMediaType(msg) => msg.clone(),
            AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Storage(_) => "There was an error storing the file".to_string(),
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// Log level for this error: client errors at debug, server faults at error.
    pub fn log_level(&self) -> LogLevel {
        match self {
            AppError::BadRequest(_)
            | AppError::UnsupportedMediaType(_)
            | AppError::PayloadTooLarge(_)
            | AppError::NotFound(_) => LogLevel::Debug,
            AppError::Storage(_) | AppError::Database(_) | AppError::Internal(_) => LogLevel::Error,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}
