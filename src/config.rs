//! Configuration for the movie discovery core.
//!
//! [`MarqueeConfig`] is built once at startup (TOML file, then environment
//! overrides) and passed into the components that need it. Business logic
//! never reads the environment itself.

use marquee_api::{MetadataConfig, StoreConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{MarqueeError, Result};

/// Environment variable names recognised by [`MarqueeConfig::apply_env`].
pub mod env_keys {
    pub const TMDB_API_KEY: &str = "MARQUEE_TMDB_API_KEY";
    pub const TMDB_BASE_URL: &str = "MARQUEE_TMDB_BASE_URL";
    pub const STORE_ENDPOINT: &str = "MARQUEE_STORE_ENDPOINT";
    pub const STORE_PROJECT_ID: &str = "MARQUEE_STORE_PROJECT_ID";
    pub const STORE_DATABASE_ID: &str = "MARQUEE_STORE_DATABASE_ID";
    pub const STORE_COLLECTION_ID: &str = "MARQUEE_STORE_COLLECTION_ID";
    pub const STORE_API_KEY: &str = "MARQUEE_STORE_API_KEY";
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarqueeConfig {
    /// Movie metadata service (TMDB).
    pub metadata: MetadataConfig,
    /// Trending-search document store (Appwrite).
    pub store: StoreConfig,
    /// Search pipeline behaviour.
    pub search: SearchSettings,
}

/// Debounce, trending and user-facing message settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Quiet period after the last keystroke before a query is committed.
    pub debounce_ms: u64,
    /// How many trending entries to load at startup.
    pub trending_limit: usize,
    /// Message shown when the movie service cannot be reached or answers
    /// with a failure status.
    pub transport_error_message: String,
    /// Message shown for a domain failure that carries no text of its own.
    pub domain_error_fallback: String,
    /// Poster URL stored for movies without a poster.
    pub placeholder_poster_url: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            trending_limit: 5,
            transport_error_message: "Failed to fetch movie".into(),
            domain_error_fallback: "Failed to fetch movie".into(),
            placeholder_poster_url: "/no-movie.png".into(),
        }
    }
}

impl SearchSettings {
    /// The debounce quiet period as a [`Duration`].
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl MarqueeConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| MarqueeError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| MarqueeError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/marquee/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("marquee").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("marquee")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/marquee-config/config.toml")
        }
    }

    /// Overlay values from the process environment.
    pub fn apply_process_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    /// Overlay values from `lookup`; empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(env_keys::TMDB_API_KEY) {
            self.metadata.api_key = v;
        }
        if let Some(v) = get(env_keys::TMDB_BASE_URL) {
            self.metadata.base_url = v;
        }
        if let Some(v) = get(env_keys::STORE_ENDPOINT) {
            self.store.endpoint = v;
        }
        if let Some(v) = get(env_keys::STORE_PROJECT_ID) {
            self.store.project_id = v;
        }
        if let Some(v) = get(env_keys::STORE_DATABASE_ID) {
            self.store.database_id = v;
        }
        if let Some(v) = get(env_keys::STORE_COLLECTION_ID) {
            self.store.collection_id = v;
        }
        if let Some(v) = get(env_keys::STORE_API_KEY) {
            self.store.api_key = v;
        }
    }

    /// Validates the search settings and the metadata service settings.
    ///
    /// The store section is validated separately by
    /// [`marquee_api::AppwriteStore::new`], since a local in-memory store
    /// needs none of it.
    ///
    /// # Errors
    ///
    /// Returns [`MarqueeError::Config`] for the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.search.debounce_ms == 0 {
            return Err(MarqueeError::Config(
                "debounce_ms must be greater than 0".into(),
            ));
        }
        if self.search.trending_limit == 0 {
            return Err(MarqueeError::Config(
                "trending_limit must be greater than 0".into(),
            ));
        }
        self.metadata
            .validate()
            .map_err(|e| MarqueeError::Config(e.to_string()))
    }
}
