//! Error types for the marquee-api crate.
//!
//! All errors use stable string messages suitable for logs and programmatic
//! handling. No API keys or bearer tokens appear in error messages.

/// Errors that can occur while talking to the movie API or the document store.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request could not be sent or the connection failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The service answered with a non-success status code.
    #[error("HTTP {status}: {message}")]
    Status {
        /// Numeric HTTP status.
        status: u16,
        /// Message extracted from the response body, or the raw body.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid client configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl ApiError {
    /// Returns the HTTP status code when the service answered with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Build a status error from a response body, preferring the service's
    /// own `message` / `status_message` field over the raw text.
    pub(crate) fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        Self::Status {
            status: status.as_u16(),
            message: extract_error_message(body),
        }
    }
}

/// Extract a human-readable error message from a JSON error body.
///
/// Appwrite uses `{"message": ...}`, TMDB uses `{"status_message": ...}`.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("status_message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}

/// Convenience type alias for marquee-api results.
pub type Result<T> = std::result::Result<T, ApiError>;
