//! Movie metadata service client.
//!
//! [`MovieSource`] is the seam the application searches through; the
//! production implementation is [`TmdbClient`], which speaks TMDB's v3 REST
//! API with bearer-token authentication.

use std::future::Future;

use url::Url;

use crate::config::MetadataConfig;
use crate::error::ApiError;
use crate::http::{build_client, read_json};
use crate::types::MovieListResponse;

/// Which listing endpoint a query maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieQuery {
    /// Free-text title search (`search/movie?query=...`).
    Search(String),
    /// Default listing, most popular first (`discover/movie?sort_by=popularity.desc`).
    Discover,
}

impl MovieQuery {
    /// Map raw user text to an endpoint: empty text means the discover list.
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            Self::Discover
        } else {
            Self::Search(text.to_string())
        }
    }

    /// Build the absolute request URL under `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if `base_url` is not a valid URL.
    pub fn endpoint(&self, base_url: &str) -> Result<Url, ApiError> {
        let base = base_url.trim_end_matches('/');
        let (path, params): (&str, [(&str, &str); 1]) = match self {
            Self::Search(text) => ("search/movie", [("query", text.as_str())]),
            Self::Discover => ("discover/movie", [("sort_by", "popularity.desc")]),
        };
        Url::parse_with_params(&format!("{base}/{path}"), params)
            .map_err(|e| ApiError::Config(format!("invalid metadata base_url {base_url:?}: {e}")))
    }
}

/// A source of movie listings.
///
/// Implementations return the decoded body of a successful response;
/// classifying domain-level failures inside that body is left to the caller
/// via [`MovieListResponse::into_outcome`].
///
/// All implementations must be `Send + Sync` so searches can run on spawned tasks.
pub trait MovieSource: Send + Sync {
    /// Fetch the listing for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on network failure, non-success status, or an
    /// undecodable body.
    fn fetch(
        &self,
        query: &MovieQuery,
    ) -> impl Future<Output = Result<MovieListResponse, ApiError>> + Send;
}

/// TMDB v3 client.
pub struct TmdbClient {
    config: MetadataConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbClient")
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

impl TmdbClient {
    /// Create a client for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the configuration is invalid, or
    /// [`ApiError::Http`] if the HTTP client cannot be built.
    pub fn new(config: MetadataConfig) -> Result<Self, ApiError> {
        config.validate()?;
        let client = build_client(config.timeout_seconds)?;
        Ok(Self { config, client })
    }
}

impl MovieSource for TmdbClient {
    async fn fetch(&self, query: &MovieQuery) -> Result<MovieListResponse, ApiError> {
        let url = query.endpoint(&self.config.base_url)?;
        tracing::debug!(endpoint = url.path(), "fetching movie listing");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| ApiError::Http(format!("movie request failed: {e}")))?;

        read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://api.themoviedb.org/3";

    #[test]
    fn empty_text_maps_to_discover() {
        assert_eq!(MovieQuery::from_text(""), MovieQuery::Discover);
        assert_eq!(
            MovieQuery::from_text("batman"),
            MovieQuery::Search("batman".into())
        );
    }

    #[test]
    fn whitespace_is_still_a_search() {
        assert_eq!(MovieQuery::from_text(" "), MovieQuery::Search(" ".into()));
    }

    #[test]
    fn discover_endpoint_sorts_by_popularity() {
        let url = MovieQuery::Discover.endpoint(BASE).expect("url");
        assert_eq!(
            url.as_str(),
            "https://api.themoviedb.org/3/discover/movie?sort_by=popularity.desc"
        );
    }

    #[test]
    fn search_endpoint_carries_query() {
        let url = MovieQuery::Search("batman".into())
            .endpoint(BASE)
            .expect("url");
        assert_eq!(url.path(), "/3/search/movie");
        assert_eq!(url.query(), Some("query=batman"));
    }

    #[test]
    fn search_endpoint_encodes_query() {
        let url = MovieQuery::Search("star wars & co".into())
            .endpoint(&format!("{BASE}/"))
            .expect("url");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("query".into(), "star wars & co".into())]);
        assert!(!url.as_str().contains(' '));
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let err = MovieQuery::Discover.endpoint("not a url").unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn client_requires_api_key() {
        let err = TmdbClient::new(MetadataConfig::default()).unwrap_err();
        assert!(err.to_string().contains("api_key"));
    }

    #[test]
    fn client_debug_hides_key() {
        let client = TmdbClient::new(MetadataConfig::new("secret-token")).expect("client");
        assert!(!format!("{client:?}").contains("secret-token"));
    }

    #[test]
    fn client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TmdbClient>();
    }
}
