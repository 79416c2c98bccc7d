//! Shared HTTP client construction.
//!
//! Both service clients use a [`reqwest::Client`] configured with a timeout,
//! a JSON `Accept` header and the crate's own User-Agent.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use std::time::Duration;

use crate::error::ApiError;

/// User-Agent sent with every request.
pub const USER_AGENT: &str = concat!("marquee/", env!("CARGO_PKG_VERSION"));

/// Build a [`reqwest::Client`] for JSON APIs.
///
/// # Errors
///
/// Returns [`ApiError::Http`] if the client cannot be constructed.
pub fn build_client(timeout_seconds: u64) -> Result<reqwest::Client, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()
        .map_err(|e| ApiError::Http(format!("failed to build HTTP client: {e}")))
}

/// Decode a successful JSON body, or map a failed status into [`ApiError`].
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::from_status(status, &body));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ApiError::Http(format!("failed to read response body: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Parse(e.to_string()))
}
