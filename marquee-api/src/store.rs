//! Trending-search document store.
//!
//! [`TrendingStore`] is the narrow set of document operations the
//! application needs. [`AppwriteStore`] implements it against the Appwrite
//! Databases REST API; [`crate::memory::InMemoryStore`] implements it in
//! process.

use std::future::Future;

use serde_json::json;

use crate::config::StoreConfig;
use crate::error::ApiError;
use crate::http::{build_client, read_json};
use crate::types::{DocumentList, NewTrendingEntry, TrendingEntry};

/// Field holding the search term on trending documents.
pub const SEARCH_TERM_FIELD: &str = "searchTerm";

/// Field holding the hit counter on trending documents.
pub const COUNT_FIELD: &str = "count";

/// Document operations over the trending-search collection.
pub trait TrendingStore: Send + Sync {
    /// List entries whose search term equals `term` exactly.
    fn find_by_term(
        &self,
        term: &str,
    ) -> impl Future<Output = Result<Vec<TrendingEntry>, ApiError>> + Send;

    /// Create a new entry; the store assigns the document id.
    fn create(
        &self,
        entry: NewTrendingEntry,
    ) -> impl Future<Output = Result<TrendingEntry, ApiError>> + Send;

    /// Overwrite only the `count` field of one document.
    fn update_count(
        &self,
        document_id: &str,
        count: i64,
    ) -> impl Future<Output = Result<TrendingEntry, ApiError>> + Send;

    /// The `limit` entries with the highest count, ties in creation order.
    fn list_top(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<TrendingEntry>, ApiError>> + Send;
}

/// Appwrite Databases REST client scoped to one collection.
pub struct AppwriteStore {
    config: StoreConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for AppwriteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppwriteStore")
            .field("endpoint", &self.config.endpoint)
            .field("collection_id", &self.config.collection_id)
            .finish()
    }
}

impl AppwriteStore {
    /// Create a store client for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the configuration is invalid, or
    /// [`ApiError::Http`] if the HTTP client cannot be built.
    pub fn new(config: StoreConfig) -> Result<Self, ApiError> {
        config.validate()?;
        let client = build_client(config.timeout_seconds)?;
        Ok(Self { config, client })
    }

    /// `{endpoint}/databases/{db}/collections/{collection}/documents`
    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.config.endpoint.trim_end_matches('/'),
            self.config.database_id,
            self.config.collection_id
        )
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .request(method, url)
            .header("X-Appwrite-Project", &self.config.project_id);
        if !self.config.api_key.is_empty() {
            request = request.header("X-Appwrite-Key", &self.config.api_key);
        }
        request
    }

    async fn list(&self, queries: Vec<String>) -> Result<Vec<TrendingEntry>, ApiError> {
        let params: Vec<(&str, String)> = queries.into_iter().map(|q| ("queries[]", q)).collect();
        let response = self
            .request(reqwest::Method::GET, &self.documents_url())
            .query(&params)
            .send()
            .await
            .map_err(|e| ApiError::Http(format!("document list failed: {e}")))?;
        let list: DocumentList<TrendingEntry> = read_json(response).await?;
        Ok(list.documents)
    }
}

/// Appwrite query-string builders (JSON query syntax, Appwrite 1.5+).
pub mod query {
    use serde_json::json;

    /// `field == value`
    pub fn equal(attribute: &str, value: &str) -> String {
        json!({"method": "equal", "attribute": attribute, "values": [value]}).to_string()
    }

    /// Sort by `attribute`, highest first.
    pub fn order_desc(attribute: &str) -> String {
        json!({"method": "orderDesc", "attribute": attribute}).to_string()
    }

    /// Sort by `attribute`, lowest first.
    pub fn order_asc(attribute: &str) -> String {
        json!({"method": "orderAsc", "attribute": attribute}).to_string()
    }

    /// Return at most `limit` documents.
    pub fn limit(limit: usize) -> String {
        json!({"method": "limit", "values": [limit]}).to_string()
    }
}

impl TrendingStore for AppwriteStore {
    async fn find_by_term(&self, term: &str) -> Result<Vec<TrendingEntry>, ApiError> {
        self.list(vec![query::equal(SEARCH_TERM_FIELD, term)]).await
    }

    async fn create(&self, entry: NewTrendingEntry) -> Result<TrendingEntry, ApiError> {
        let body = json!({ "documentId": "unique()", "data": entry });
        let response = self
            .request(reqwest::Method::POST, &self.documents_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Http(format!("document create failed: {e}")))?;
        read_json(response).await
    }

    async fn update_count(&self, document_id: &str, count: i64) -> Result<TrendingEntry, ApiError> {
        let url = format!("{}/{document_id}", self.documents_url());
        let body = json!({ "data": { (COUNT_FIELD): count } });
        let response = self
            .request(reqwest::Method::PATCH, &url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Http(format!("document update failed: {e}")))?;
        read_json(response).await
    }

    async fn list_top(&self, limit: usize) -> Result<Vec<TrendingEntry>, ApiError> {
        self.list(vec![
            query::limit(limit),
            query::order_desc(COUNT_FIELD),
            query::order_asc("$createdAt"),
        ])
        .await
    }
}
