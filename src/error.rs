//! Unified error types for the cloud monitoring client.

use reqwest::StatusCode;
use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Request-body validation errors, raised before any network call.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Field '{field}' has invalid size {actual} (allowed {min}..={max})")]
    InvalidSize {
        field: &'static str,
        actual: usize,
        min: usize,
        max: usize,
    },

    #[error("Field '{field}' out of range: {actual} (allowed {min}..={max})")]
    InvalidRange {
        field: &'static str,
        actual: i64,
        min: i64,
        max: i64,
    },

    #[error("Invalid agent ID '{0}': must match ^[-.\\w]{{1,255}}$")]
    InvalidAgentId(String),

    #[error("Invalid notification type '{0}': must be 'webhook' or 'email'")]
    InvalidNotificationType(String),
}

/// API request/response errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP error {status}: {body}")]
    HttpError { status: StatusCode, body: String },

    #[error("Service error [{error_type}]: {message}")]
    Service {
        status: StatusCode,
        error_type: String,
        message: String,
    },

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Response carried no body where one was expected")]
    EmptyResponse,

    #[error("Create response carried no usable Location header")]
    MissingLocation,

    #[error("Failed to create HTTP client: {0}")]
    HttpClientInit(String),
}
