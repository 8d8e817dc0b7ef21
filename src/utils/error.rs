//! Error handling module
//!
//! Classifies failed API responses and defines the local errors raised by the client

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Retry hint used when a 429 response carries no usable `retry-after` header
pub const DEFAULT_RETRY_AFTER: u64 = 3600;

/// Diagnostic message attached to responses that fit no other category
pub const GENERIC_FAILURE_MESSAGE: &str = "Unexpected response status from the Spark API";

/// Client error types
#[derive(Error, Debug)]
pub enum SparkError {
    /// The access token was rejected (401)
    #[error("Request not authorized")]
    Unauthorized {
        /// Decoded response body
        body: Value,
    },

    /// The requested resource does not exist (404)
    #[error("Resource not found: {body}")]
    NotFound {
        /// Decoded response body
        body: Value,
    },

    /// Rate limit hit (429)
    #[error("Too many requests, please try again after {retry_after} seconds")]
    TooManyRequests {
        /// Seconds the caller should wait before retrying
        retry_after: u64,
        /// Decoded response body
        body: Value,
    },

    /// The service failed to handle the request (5xx)
    #[error("Something went wrong on the server: status code {status}, content: {body}")]
    ServerError { status: u16, body: Value },

    /// The service rejected the request (4xx other than 401, 404 and 429)
    #[error("Invalid request: status code {status}, content: {body}")]
    InvalidRequest { status: u16, body: Value },

    /// Any status the client does not know how to interpret
    #[error("{message}: status code {status}, content: {body}")]
    Generic {
        status: u16,
        body: Value,
        message: &'static str,
    },

    /// Request parameters failed local validation, nothing was sent
    #[error("Request validation failed: {0}")]
    Validation(String),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A local attachment could not be read
    #[error("Attachment error: {0}")]
    Attachment(#[from] std::io::Error),

    /// The client was closed before this call
    #[error("Client has been closed")]
    Closed,
}

/// Error payload returned by the Spark API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Human readable message
    #[serde(default)]
    pub message: Option<String>,
    /// Per-field error details
    #[serde(default)]
    pub errors: Vec<Value>,
    /// Tracking id to quote when contacting support
    #[serde(rename = "trackingId", default)]
    pub tracking_id: Option<String>,
}

impl SparkError {
    /// Map a non-success response to its error kind.
    ///
    /// `retry_after` is the raw `retry-after` header value, if any. `body` is
    /// the already decoded response body (see [`decode_body`]).
    pub fn classify(status: u16, retry_after: Option<&str>, body: Value) -> Self {
        match status {
            401 => SparkError::Unauthorized { body },
            404 => SparkError::NotFound { body },
            429 => SparkError::TooManyRequests {
                retry_after: parse_retry_after(retry_after),
                body,
            },
            500..=599 => SparkError::ServerError { status, body },
            400..=499 => SparkError::InvalidRequest { status, body },
            _ => SparkError::Generic {
                status,
                body,
                message: GENERIC_FAILURE_MESSAGE,
            },
        }
    }

    /// Classify a failed response, consuming it.
    ///
    /// The body stream is read exactly once here; a body that cannot be read
    /// is reported as `null`.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let body = match response.text().await {
            Ok(text) => decode_body(&text),
            Err(e) => {
                tracing::debug!("Failed to read error response body: {}", e);
                Value::Null
            }
        };

        Self::classify(status, retry_after.as_deref(), body)
    }

    /// HTTP status of a classified API error
    pub fn status(&self) -> Option<u16> {
        match self {
            SparkError::Unauthorized { .. } => Some(401),
            SparkError::NotFound { .. } => Some(404),
            SparkError::TooManyRequests { .. } => Some(429),
            SparkError::ServerError { status, .. }
            | SparkError::InvalidRequest { status, .. }
            | SparkError::Generic { status, .. } => Some(*status),
            SparkError::HttpClient(e) => e.status().map(|s| s.as_u16()),
            SparkError::Validation(_)
            | SparkError::Serialization(_)
            | SparkError::Attachment(_)
            | SparkError::Closed => None,
        }
    }

    /// Decoded response body of a classified API error
    pub fn body(&self) -> Option<&Value> {
        match self {
            SparkError::Unauthorized { body }
            | SparkError::NotFound { body }
            | SparkError::TooManyRequests { body, .. }
            | SparkError::ServerError { body, .. }
            | SparkError::InvalidRequest { body, .. }
            | SparkError::Generic { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Seconds to wait before retrying, only set for rate limited requests
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            SparkError::TooManyRequests { retry_after, .. } => Some(*retry_after),
            _ => None,
        }
    }

    /// Whether the remote service answered and rejected the call
    pub fn is_api_error(&self) -> bool {
        matches!(
            self,
            SparkError::Unauthorized { .. }
                | SparkError::NotFound { .. }
                | SparkError::TooManyRequests { .. }
                | SparkError::ServerError { .. }
                | SparkError::InvalidRequest { .. }
                | SparkError::Generic { .. }
        )
    }

    /// Get error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            SparkError::Unauthorized { .. } => "unauthorized",
            SparkError::NotFound { .. } => "not_found",
            SparkError::TooManyRequests { .. } => "too_many_requests",
            SparkError::ServerError { .. } => "server_error",
            SparkError::InvalidRequest { .. } => "invalid_request",
            SparkError::Generic { .. } => "api_error",
            SparkError::Validation(_) => "validation_error",
            SparkError::HttpClient(_) => "http_client_error",
            SparkError::Serialization(_) => "serialization_error",
            SparkError::Attachment(_) => "attachment_error",
            SparkError::Closed => "client_closed",
        }
    }

    /// Structured error payload, when the body follows the API's error format
    pub fn api_error_body(&self) -> Option<ApiErrorBody> {
        self.body()
            .filter(|b| b.is_object())
            .and_then(|b| serde_json::from_value(b.clone()).ok())
    }
}

/// Decode a raw response body.
///
/// Empty bodies become `null`, non-JSON bodies are kept as a string.
pub fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn parse_retry_after(value: Option<&str>) -> u64 {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

/// Result type alias
pub type SparkResult<T> = Result<T, SparkError>;

/// Error handling helper functions
pub mod helpers {
    use super::*;

    /// Create validation error
    pub fn validation_error(message: impl Into<String>) -> SparkError {
        SparkError::Validation(message.into())
    }
}
