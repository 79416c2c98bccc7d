//! Trending searches: record successful searches and load the top list.
//!
//! Both operations talk only to the [`TrendingStore`]. Their failures are
//! side-effect errors: callers log or observe them, and they never reach the
//! search state.

use std::sync::Arc;

use marquee_api::{Movie, NewTrendingEntry, TrendingEntry, TrendingStore};
use tracing::{debug, warn};

use crate::error::Result;

/// Create-or-increment counters and top-N reads over a [`TrendingStore`].
pub struct TrendingService<S> {
    store: Arc<S>,
    image_base_url: String,
    placeholder_poster_url: String,
    limit: usize,
}

impl<S> Clone for TrendingService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            image_base_url: self.image_base_url.clone(),
            placeholder_poster_url: self.placeholder_poster_url.clone(),
            limit: self.limit,
        }
    }
}

impl<S: TrendingStore> TrendingService<S> {
    /// Service over `store` with TMDB poster URLs and the default placeholder.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            image_base_url: marquee_api::config::DEFAULT_IMAGE_BASE_URL.into(),
            placeholder_poster_url: "/no-movie.png".into(),
            limit: 5,
        }
    }

    /// Override the image CDN prefix used to build poster URLs.
    pub fn with_image_base_url(mut self, url: impl Into<String>) -> Self {
        self.image_base_url = url.into();
        self
    }

    /// Override the poster URL stored for movies without a poster.
    pub fn with_placeholder_poster_url(mut self, url: impl Into<String>) -> Self {
        self.placeholder_poster_url = url.into();
        self
    }

    /// Override how many entries [`Self::load_trending`] returns.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Poster URL stored for `movie`.
    pub fn poster_url_for(&self, movie: &Movie) -> String {
        movie
            .poster_url(&self.image_base_url)
            .unwrap_or_else(|| self.placeholder_poster_url.clone())
    }

    /// Count one successful search for `search_term`.
    ///
    /// Increments the existing entry for the exact term, or creates one with
    /// `count = 1` pointing at `movie`. Concurrent increments from other
    /// sessions are not reconciled: the last write wins.
    ///
    /// # Errors
    ///
    /// Returns the store error; nothing is retried.
    pub async fn record_search(&self, search_term: &str, movie: &Movie) -> Result<TrendingEntry> {
        let existing = self.store.find_by_term(search_term).await?;

        if let Some(entry) = existing.into_iter().next() {
            let count = entry.count + 1;
            debug!(document_id = %entry.document_id, count, "incrementing trending count");
            let updated = self.store.update_count(&entry.document_id, count).await?;
            return Ok(updated);
        }

        debug!(movie_id = movie.id, "creating trending entry");
        let created = self
            .store
            .create(NewTrendingEntry {
                search_term: search_term.to_string(),
                count: 1,
                movie_id: movie.id,
                poster_url: self.poster_url_for(movie),
            })
            .await?;
        Ok(created)
    }

    /// Top entries by count, highest first; ties keep the store's order.
    ///
    /// # Errors
    ///
    /// Returns the store error.
    pub async fn try_load_trending(&self) -> Result<Vec<TrendingEntry>> {
        let mut entries = self.store.list_top(self.limit).await?;
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        entries.truncate(self.limit);
        Ok(entries)
    }

    /// Like [`Self::try_load_trending`], but a failure is logged and yields
    /// an empty list.
    pub async fn load_trending(&self) -> Vec<TrendingEntry> {
        match self.try_load_trending().await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "failed to load trending searches");
                Vec::new()
            }
        }
    }
}
