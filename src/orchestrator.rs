//! Search orchestrator: fetch, classify, publish, record.
//!
//! One [`SearchOrchestrator::search`] call per committed query:
//!
//! 1. Take a generation ticket and publish [`SearchPhase::Loading`]
//! 2. Fetch the discover list (empty query) or the search results
//! 3. Classify into success, empty results, domain error or transport error
//! 4. Publish the terminal phase, unless a newer search has started since
//! 5. For a non-empty query with results, record the search in the trending
//!    store on a detached task
//!
//! State is published through a [`watch`] channel. Every publish checks the
//! ticket against the latest issued generation inside the channel's write
//! lock, so a slow, superseded search can never overwrite a newer one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use marquee_api::{
    Movie, MovieListOutcome, MovieQuery, MovieSource, TrendingEntry, TrendingStore,
};
use tokio::sync::{Mutex, mpsc, watch};
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

use crate::config::{MarqueeConfig, SearchSettings};
use crate::error::SideEffectError;
use crate::state::{SearchPhase, SearchState};
use crate::trending::TrendingService;

/// User-facing error texts.
#[derive(Debug, Clone)]
struct ErrorMessages {
    transport: String,
    domain_fallback: String,
}

/// Drives searches against a [`MovieSource`] and owns the published [`SearchState`].
pub struct SearchOrchestrator<M, S> {
    source: Arc<M>,
    trending: TrendingService<S>,
    messages: ErrorMessages,
    generation: Arc<AtomicU64>,
    state_tx: watch::Sender<SearchState>,
    side_effects: TaskTracker,
    flush_lock: Mutex<()>,
    side_effect_sink: Option<mpsc::UnboundedSender<SideEffectError>>,
}

impl<M, S> SearchOrchestrator<M, S>
where
    M: MovieSource + 'static,
    S: TrendingStore + 'static,
{
    /// Create an orchestrator in the [`SearchPhase::Idle`] state.
    pub fn new(source: Arc<M>, trending: TrendingService<S>, settings: &SearchSettings) -> Self {
        let (state_tx, _) = watch::channel(SearchState::default());
        Self {
            source,
            trending,
            messages: ErrorMessages {
                transport: settings.transport_error_message.clone(),
                domain_fallback: settings.domain_error_fallback.clone(),
            },
            generation: Arc::new(AtomicU64::new(0)),
            state_tx,
            side_effects: TaskTracker::new(),
            flush_lock: Mutex::new(()),
            side_effect_sink: None,
        }
    }

    /// Orchestrator whose trending service follows `config`: poster prefix,
    /// placeholder poster and list length.
    pub fn from_config(source: Arc<M>, store: Arc<S>, config: &MarqueeConfig) -> Self {
        let trending = TrendingService::new(store)
            .with_image_base_url(config.metadata.image_base_url.clone())
            .with_placeholder_poster_url(config.search.placeholder_poster_url.clone())
            .with_limit(config.search.trending_limit);
        Self::new(source, trending, &config.search)
    }

    /// Also report side-effect failures on `sink`, besides logging them.
    pub fn with_side_effect_sink(mut self, sink: mpsc::UnboundedSender<SideEffectError>) -> Self {
        self.side_effect_sink = Some(sink);
        self
    }

    /// Current state snapshot.
    pub fn state(&self) -> SearchState {
        self.state_tx.borrow().clone()
    }

    /// Watch state changes.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state_tx.subscribe()
    }

    pub fn trending(&self) -> &TrendingService<S> {
        &self.trending
    }

    /// Load the trending list once. A failure is logged, reported to the
    /// side-effect sink, and yields an empty list.
    pub async fn load_trending(&self) -> Vec<TrendingEntry> {
        match self.trending.try_load_trending().await {
            Ok(entries) => {
                debug!(count = entries.len(), "trending searches loaded");
                entries
            }
            Err(err) => {
                warn!(error = %err, "failed to load trending searches");
                if let Some(sink) = &self.side_effect_sink {
                    let _ = sink.send(SideEffectError::LoadTrending(err.to_string()));
                }
                Vec::new()
            }
        }
    }

    /// Wait until every detached side effect spawned so far has finished.
    ///
    /// Concurrent callers are serialized; each sees the tracker drained.
    pub async fn flush_side_effects(&self) {
        let _flush = self.flush_lock.lock().await;
        self.side_effects.close();
        self.side_effects.wait().await;
        self.side_effects.reopen();
    }

    /// Run one search for `query` and return the phase it resolved to.
    ///
    /// The returned phase is the resolution of this call even when a newer
    /// search has superseded it and it was therefore not published.
    pub async fn search(&self, query: &str) -> SearchPhase {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(ticket, query, "search dispatched");

        let mut loading = LoadingGuard::acquire(&self.state_tx, &self.generation, ticket, query);
        let phase = self.resolve(query).await;
        loading.release();

        if !publish(&self.state_tx, &self.generation, ticket, phase.clone()) {
            debug!(ticket, query, "discarding stale search resolution");
        }

        if let SearchPhase::Success { movies, .. } = &phase {
            if !query.is_empty() {
                if let Some(first) = movies.first() {
                    self.spawn_record_search(query.to_string(), first.clone());
                }
            }
        }

        phase
    }

    async fn resolve(&self, query: &str) -> SearchPhase {
        let request = MovieQuery::from_text(query);
        let query = query.to_string();

        let response = match self.source.fetch(&request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "movie request failed");
                return SearchPhase::TransportError {
                    query,
                    message: self.messages.transport.clone(),
                };
            }
        };

        match response.into_outcome() {
            MovieListOutcome::Failure(message) => {
                debug!(reason = ?message, "movie service reported a failure");
                SearchPhase::DomainError {
                    query,
                    message: message.unwrap_or_else(|| self.messages.domain_fallback.clone()),
                }
            }
            MovieListOutcome::Results(movies) if movies.is_empty() => {
                SearchPhase::EmptyResults { query }
            }
            MovieListOutcome::Results(movies) => SearchPhase::Success { query, movies },
        }
    }

    fn spawn_record_search(&self, term: String, movie: Movie) {
        let trending = self.trending.clone();
        let sink = self.side_effect_sink.clone();
        self.side_effects.spawn(async move {
            match trending.record_search(&term, &movie).await {
                Ok(entry) => debug!(count = entry.count, "trending search recorded"),
                Err(err) => {
                    warn!(error = %err, "failed to record trending search");
                    if let Some(sink) = sink {
                        let _ = sink.send(SideEffectError::RecordSearch {
                            term,
                            message: err.to_string(),
                        });
                    }
                }
            }
        });
    }
}

/// Replace the state with `phase` if `ticket` is still the latest generation.
fn publish(
    state_tx: &watch::Sender<SearchState>,
    generation: &AtomicU64,
    ticket: u64,
    phase: SearchPhase,
) -> bool {
    state_tx.send_if_modified(|state| {
        if generation.load(Ordering::SeqCst) != ticket {
            return false;
        }
        *state = SearchState {
            generation: ticket,
            phase,
        };
        true
    })
}

/// Holds the loading phase for one search.
///
/// Dropped without [`LoadingGuard::release`] (the search future was
/// cancelled or panicked), it puts the state back to `Idle` so loading never
/// outlives its search.
struct LoadingGuard<'a> {
    state_tx: &'a watch::Sender<SearchState>,
    generation: &'a AtomicU64,
    ticket: u64,
    held: bool,
}

impl<'a> LoadingGuard<'a> {
    fn acquire(
        state_tx: &'a watch::Sender<SearchState>,
        generation: &'a AtomicU64,
        ticket: u64,
        query: &str,
    ) -> Self {
        let phase = SearchPhase::Loading {
            query: query.to_string(),
        };
        let held = publish(state_tx, generation, ticket, phase);
        Self {
            state_tx,
            generation,
            ticket,
            held,
        }
    }

    /// The caller publishes the terminal phase itself.
    fn release(&mut self) {
        self.held = false;
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.held {
            debug!(ticket = self.ticket, "search abandoned while loading");
            publish(self.state_tx, self.generation, self.ticket, SearchPhase::Idle);
        }
    }
}
