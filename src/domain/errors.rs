//! Domain error types
//!
//! This module defines the error hierarchy for the exporter. Errors are
//! domain-specific and don't expose third-party types.

use std::time::Duration;
use thiserror::Error;

/// Main exporter error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum ExporterError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Consent API errors
    #[error("Consent API error: {0}")]
    Api(#[from] ApiError),

    /// A required argument was missing or had the wrong shape
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Consent API errors
///
/// Errors that occur when talking to the remote consent-management API.
/// These errors don't expose the HTTP client's types.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failed to reach the server
    #[error("Failed to connect to consent API: {0}")]
    ConnectionFailed(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Rate limited by the server (429)
    #[error("Rate limit exceeded (429){}", retry_after_suffix(.retry_after))]
    RateLimited {
        /// Value of the `Retry-After` header, when the server sent one
        retry_after: Option<Duration>,
    },

    /// Client error (4xx other than 429)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Response could not be interpreted
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Whether the request that produced this error may be sent again.
    ///
    /// Every request the exporter issues is a GET, so server errors are
    /// retried along with transport failures and throttling.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::ConnectionFailed(_)
            | ApiError::Timeout(_)
            | ApiError::RateLimited { .. }
            | ApiError::ServerError { .. } => true,
            ApiError::ClientError { .. } | ApiError::InvalidResponse(_) => false,
        }
    }

    /// Minimum delay the server asked for before the next attempt
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ApiError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

fn retry_after_suffix(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(delay) => format!(", retry after {}s", delay.as_secs()),
        None => String::new(),
    }
}

impl From<std::io::Error> for ExporterError {
    fn from(err: std::io::Error) -> Self {
        ExporterError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ExporterError {
    fn from(err: serde_json::Error) -> Self {
        ExporterError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ExporterError {
    fn from(err: toml::de::Error) -> Self {
        ExporterError::Configuration(format!("TOML parse error: {err}"))
    }
}
