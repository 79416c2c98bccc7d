//! A running search session: raw input in, search state and trending out.
//!
//! [`SearchSession::start`] wires a [`QueryDebouncer`] to a
//! [`SearchOrchestrator`]. On start it dispatches the discover search for the
//! empty query and loads the trending list once, concurrently. Every query
//! the debouncer commits afterwards is dispatched as its own task; the
//! orchestrator's generation guard decides which resolution is shown.

use std::sync::Arc;
use std::time::Duration;

use marquee_api::{MovieSource, TrendingEntry, TrendingStore};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};

use crate::debounce::QueryDebouncer;
use crate::orchestrator::SearchOrchestrator;
use crate::state::SearchState;

/// Owns the debouncer, the dispatch loop and every in-flight search.
pub struct SearchSession<M, S> {
    debouncer: QueryDebouncer,
    orchestrator: Arc<SearchOrchestrator<M, S>>,
    trending_rx: watch::Receiver<Vec<TrendingEntry>>,
    searches: TaskTracker,
    cancel: CancellationToken,
    driver: JoinHandle<()>,
}

impl<M, S> SearchSession<M, S>
where
    M: MovieSource + 'static,
    S: TrendingStore + 'static,
{
    /// Start a session. Must be called within a tokio runtime.
    pub fn start(orchestrator: SearchOrchestrator<M, S>, quiet_period: Duration) -> Self {
        let orchestrator = Arc::new(orchestrator);
        let (debouncer, committed_rx) = QueryDebouncer::spawn("", quiet_period);
        let (trending_tx, trending_rx) = watch::channel(Vec::new());
        let searches = TaskTracker::new();
        let cancel = CancellationToken::new();

        let loader = Arc::clone(&orchestrator);
        searches.spawn(async move {
            let entries = loader.load_trending().await;
            trending_tx.send_replace(entries);
        });

        let driver = tokio::spawn(drive(
            Arc::clone(&orchestrator),
            committed_rx,
            searches.clone(),
            cancel.clone(),
        ));

        info!(?quiet_period, "search session started");
        Self {
            debouncer,
            orchestrator,
            trending_rx,
            searches,
            cancel,
            driver,
        }
    }

    /// Record a keystroke-level change of the search box.
    pub fn set_raw_input(&self, value: impl Into<String>) {
        self.debouncer.set_raw_input(value);
    }

    /// Current raw input, exactly as typed.
    pub fn raw_input(&self) -> String {
        self.debouncer.raw_input()
    }

    pub fn state(&self) -> SearchState {
        self.orchestrator.state()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<SearchState> {
        self.orchestrator.subscribe()
    }

    /// Trending list; empty until the startup load finishes, and after a
    /// failed load.
    pub fn trending(&self) -> Vec<TrendingEntry> {
        self.trending_rx.borrow().clone()
    }

    pub fn subscribe_trending(&self) -> watch::Receiver<Vec<TrendingEntry>> {
        self.trending_rx.clone()
    }

    /// Stop accepting input, let in-flight searches and side effects finish.
    ///
    /// Input still inside the quiet period is dropped without a search.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        self.debouncer.shutdown().await;
        let _ = self.driver.await;
        self.searches.close();
        self.searches.wait().await;
        self.orchestrator.flush_side_effects().await;
        info!("search session stopped");
    }
}

async fn drive<M, S>(
    orchestrator: Arc<SearchOrchestrator<M, S>>,
    mut committed_rx: mpsc::UnboundedReceiver<String>,
    searches: TaskTracker,
    cancel: CancellationToken,
) where
    M: MovieSource + 'static,
    S: TrendingStore + 'static,
{
    dispatch(&orchestrator, &searches, String::new());

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            next = committed_rx.recv() => match next {
                Some(query) => dispatch(&orchestrator, &searches, query),
                None => break,
            },
        }
    }
    debug!("dispatch loop finished");
}

fn dispatch<M, S>(
    orchestrator: &Arc<SearchOrchestrator<M, S>>,
    searches: &TaskTracker,
    query: String,
) where
    M: MovieSource + 'static,
    S: TrendingStore + 'static,
{
    let orchestrator = Arc::clone(orchestrator);
    searches.spawn(async move {
        orchestrator.search(&query).await;
    });
}
