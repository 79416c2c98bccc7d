//! Shared test doubles used across multiple test modules.

use std::sync::Mutex;
use std::time::Duration;

use marquee_api::{
    ApiError, Movie, MovieListResponse, MovieQuery, MovieSource, NewTrendingEntry,
    TrendingEntry, TrendingStore,
};

type Reply = (Duration, Result<MovieListResponse, ApiError>);
type Handler = Box<dyn Fn(&MovieQuery) -> Reply + Send + Sync>;

/// Movie source answering from a closure, after an optional delay, and
/// recording every query it receives.
pub struct ScriptedSource {
    calls: Mutex<Vec<MovieQuery>>,
    handler: Handler,
}

impl ScriptedSource {
    pub fn new(
        handler: impl Fn(&MovieQuery) -> Reply + Send + Sync + 'static,
    ) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            handler: Box::new(handler),
        }
    }

    /// Always answer immediately with `movies`.
    pub fn with_movies(movies: Vec<Movie>) -> Self {
        Self::new(move |_| (Duration::ZERO, Ok(results(movies.clone()))))
    }

    /// Always fail with a 500.
    pub fn failing() -> Self {
        Self::new(|_| {
            (
                Duration::ZERO,
                Err(ApiError::Status {
                    status: 500,
                    message: "internal".into(),
                }),
            )
        })
    }

    pub fn calls(&self) -> Vec<MovieQuery> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl MovieSource for ScriptedSource {
    async fn fetch(&self, query: &MovieQuery) -> Result<MovieListResponse, ApiError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(query.clone());
        }
        let (delay, outcome) = (self.handler)(query);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        outcome
    }
}

/// Successful listing body with `movies`.
pub fn results(movies: Vec<Movie>) -> MovieListResponse {
    MovieListResponse {
        results: movies,
        ..Default::default()
    }
}

/// Successful body carrying a `Response: false` failure.
pub fn domain_failure(message: Option<&str>) -> MovieListResponse {
    MovieListResponse {
        response: Some(false),
        error: message.map(String::from),
        ..Default::default()
    }
}

/// Document store whose every call fails.
pub struct BrokenStore;

impl TrendingStore for BrokenStore {
    async fn find_by_term(&self, _term: &str) -> Result<Vec<TrendingEntry>, ApiError> {
        Err(ApiError::Http("store offline".into()))
    }

    async fn create(&self, _entry: NewTrendingEntry) -> Result<TrendingEntry, ApiError> {
        Err(ApiError::Http("store offline".into()))
    }

    async fn update_count(&self, _id: &str, _count: i64) -> Result<TrendingEntry, ApiError> {
        Err(ApiError::Http("store offline".into()))
    }

    async fn list_top(&self, _limit: usize) -> Result<Vec<TrendingEntry>, ApiError> {
        Err(ApiError::Http("store offline".into()))
    }
}

/// Trending entry fixture.
pub fn entry(id: &str, term: &str, count: i64) -> TrendingEntry {
    TrendingEntry {
        document_id: id.into(),
        search_term: term.into(),
        count,
        movie_id: 1,
        poster_url: "/no-movie.png".into(),
    }
}
