//! Client error types.

use reqwest::StatusCode;
use thiserror::Error;

/// Body discriminator the backend uses for infrastructure outages.
pub(crate) const SERVICE_UNAVAILABLE_CODE: &str = "service_unavailable";

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error code from server.
        code: String,
        /// Error message from server.
        message: String,
    },

    /// Authentication failed (401).
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend reported an infrastructure outage (503 + `service_unavailable`).
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Token store could not be read or written.
    #[error("Token store error: {0}")]
    TokenStore(String),
}

impl Error {
    /// Build an error from a failed response's status and raw body.
    pub(crate) fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let code = status.as_u16();
        let parsed = serde_json::from_slice::<ErrorResponse>(body).ok();

        let message = parsed
            .as_ref()
            .and_then(|e| e.message.clone())
            .unwrap_or_else(|| format!("HTTP {}", code));

        match code {
            401 => Error::Auth(message),
            404 => Error::NotFound(message),
            503 if parsed
                .as_ref()
                .is_some_and(ErrorResponse::is_service_unavailable) =>
            {
                Error::ServiceUnavailable(message)
            }
            _ => Error::Api {
                status: code,
                code: parsed
                    .and_then(|e| e.code.or(e.error))
                    .unwrap_or_else(|| "unknown".to_string()),
                message,
            },
        }
    }

    /// HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Auth(_) => Some(401),
            Error::NotFound(_) => Some(404),
            Error::ServiceUnavailable(_) => Some(503),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_)) || matches!(self, Error::Api { status: 404, .. })
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Auth(_)) || matches!(self, Error::Api { status: 401, .. })
    }

    /// Check if the backend reported an infrastructure outage.
    pub fn is_service_unavailable(&self) -> bool {
        matches!(self, Error::ServiceUnavailable(_))
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| s >= 500)
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error body returned by the backend.
///
/// Outage responses use `error` as the discriminator, ordinary failures
/// usually carry `message` and sometimes `code`.
#[derive(Debug, Default, serde::Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub(crate) fn is_service_unavailable(&self) -> bool {
        self.error.as_deref() == Some(SERVICE_UNAVAILABLE_CODE)
    }
}
