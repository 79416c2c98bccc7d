//! Debounced query controller.
//!
//! [`QueryDebouncer`] owns the raw search input. Every change restarts a
//! quiet-period timer; when the timer runs out the current input is emitted
//! once as the committed query. Dropping or shutting down the controller
//! cancels any pending timer, so nothing is emitted after teardown.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Raw-input holder with a background quiet-period timer.
pub struct QueryDebouncer {
    raw_tx: watch::Sender<String>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl QueryDebouncer {
    /// Start the controller with `initial` as both raw input and last
    /// committed query.
    ///
    /// Returns the controller and the receiving end of the committed-query
    /// stream. Must be called from within a tokio runtime.
    pub fn spawn(
        initial: impl Into<String>,
        quiet_period: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<String>) {
        let initial = initial.into();
        let (raw_tx, raw_rx) = watch::channel(initial.clone());
        let (committed_tx, committed_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let task = tokio::spawn(run(
            raw_rx,
            committed_tx,
            initial,
            quiet_period,
            cancel.clone(),
        ));

        let debouncer = Self {
            raw_tx,
            cancel,
            task: Some(task),
        };
        (debouncer, committed_rx)
    }

    /// Replace the raw input, restarting the quiet-period timer.
    pub fn set_raw_input(&self, value: impl Into<String>) {
        self.raw_tx.send_replace(value.into());
    }

    /// Current raw input.
    pub fn raw_input(&self) -> String {
        self.raw_tx.borrow().clone()
    }

    /// Watch the raw input, e.g. to echo it in a text field.
    pub fn subscribe_raw_input(&self) -> watch::Receiver<String> {
        self.raw_tx.subscribe()
    }

    /// Cancel any pending timer and wait for the timer task to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for QueryDebouncer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Timer loop: wait for a change, then for a full quiet period without one.
async fn run(
    mut raw_rx: watch::Receiver<String>,
    committed_tx: mpsc::UnboundedSender<String>,
    mut last_committed: String,
    quiet_period: Duration,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            changed = raw_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }

        // A change is pending. Each further change restarts the timer.
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("debouncer cancelled with pending input");
                    return;
                }
                changed = raw_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    trace!("raw input changed, timer restarted");
                }
                _ = tokio::time::sleep(quiet_period) => break,
            }
        }

        let value = raw_rx.borrow_and_update().clone();
        if value == last_committed {
            trace!("quiet period ended on the already committed query");
            continue;
        }
        debug!(query = %value, "query committed");
        last_committed = value.clone();
        if committed_tx.send(value).is_err() {
            break;
        }
    }
}
