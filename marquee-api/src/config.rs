//! Client configuration with sensible defaults.
//!
//! [`MetadataConfig`] points at the TMDB API, [`StoreConfig`] at an Appwrite
//! collection holding trending-search documents. Both are plain data: the
//! caller builds them once (from a file, environment, or test fixture) and
//! hands them to the clients.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ApiError;

/// Default TMDB API root.
pub const DEFAULT_METADATA_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Default TMDB image CDN prefix used to turn poster paths into URLs.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Default Appwrite cloud endpoint.
pub const DEFAULT_STORE_ENDPOINT: &str = "https://cloud.appwrite.io/v1";

/// Connection settings for the movie metadata service.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Bearer token sent in the `Authorization` header.
    pub api_key: String,
    /// API root, without a trailing slash.
    pub base_url: String,
    /// Prefix prepended to a movie's `poster_path`.
    pub image_base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_METADATA_BASE_URL.into(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.into(),
            timeout_seconds: 10,
        }
    }
}

impl MetadataConfig {
    /// Create a config with the given key and default endpoints.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Point the client at a different API root (used by tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Validates this configuration, returning an error if any field is invalid.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.api_key.trim().is_empty() {
            return Err(ApiError::Config("metadata api_key must be set".into()));
        }
        if self.base_url.trim().is_empty() {
            return Err(ApiError::Config("metadata base_url must be set".into()));
        }
        if self.timeout_seconds == 0 {
            return Err(ApiError::Config(
                "metadata timeout_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for MetadataConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("image_base_url", &self.image_base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Connection settings for the Appwrite document store.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Appwrite REST root, e.g. `https://cloud.appwrite.io/v1`.
    pub endpoint: String,
    /// Sent as `X-Appwrite-Project`.
    pub project_id: String,
    pub database_id: String,
    pub collection_id: String,
    /// Optional server key sent as `X-Appwrite-Key`. Empty means anonymous
    /// access governed by collection permissions.
    pub api_key: String,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_STORE_ENDPOINT.into(),
            project_id: String::new(),
            database_id: String::new(),
            collection_id: String::new(),
            api_key: String::new(),
            timeout_seconds: 10,
        }
    }
}

impl StoreConfig {
    /// Create a config addressing one collection at the default endpoint.
    pub fn new(
        project_id: impl Into<String>,
        database_id: impl Into<String>,
        collection_id: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            database_id: database_id.into(),
            collection_id: collection_id.into(),
            ..Default::default()
        }
    }

    /// Set a custom endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set a server API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Validates this configuration, returning an error if any field is invalid.
    pub fn validate(&self) -> Result<(), ApiError> {
        let required = [
            ("endpoint", &self.endpoint),
            ("project_id", &self.project_id),
            ("database_id", &self.database_id),
            ("collection_id", &self.collection_id),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ApiError::Config(format!("store {name} must be set")));
            }
        }
        if self.timeout_seconds == 0 {
            return Err(ApiError::Config(
                "store timeout_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("endpoint", &self.endpoint)
            .field("project_id", &self.project_id)
            .field("database_id", &self.database_id)
            .field("collection_id", &self.collection_id)
            .field("api_key", &redact(&self.api_key))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}
