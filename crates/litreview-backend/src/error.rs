//! Error types for the literature review backend.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors from the HTTP client layer.
///
/// Retryable conditions (429, 5xx, timeouts) never surface here; the client
/// absorbs them and reports exhaustion as a `SearchOutcome`.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-retryable error status (4xx other than 429)
    #[error("Upstream returned {status}: {message}")]
    UpstreamStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },
}

impl ClientError {
    /// Create an upstream status error.
    #[must_use]
    pub fn upstream_status(status: u16, message: impl Into<String>) -> Self {
        Self::UpstreamStatus { status, message: message.into() }
    }

    /// Status code returned by the upstream API, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::UpstreamStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors returned to callers of `POST /search`.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// Body missing, not JSON, or not a JSON object.
    #[error("Request must be JSON")]
    InvalidRequest,

    /// `query` absent, empty, or not a string.
    #[error("Missing 'query' in request data")]
    MissingQuery,

    /// `limit` present but not a positive integer.
    #[error("'limit' must be a positive integer")]
    InvalidLimit,

    /// Unexpected failure while calling the upstream API.
    #[error("An internal server error occurred during search API call")]
    Upstream(#[source] ClientError),

    /// Upstream retries exhausted or the transport gave up.
    #[error(
        "Failed to retrieve papers from external API after multiple attempts. Please try again later."
    )]
    Unavailable,
}

impl ApiError {
    /// HTTP status reported for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest | Self::MissingQuery | Self::InvalidLimit => {
                StatusCode::BAD_REQUEST
            }
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        Self::Upstream(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status_code(), Json(body)).into_response()
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for handler operations.
pub type ApiResult<T> = Result<T, ApiError>;
