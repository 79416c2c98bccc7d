//! In-process [`TrendingStore`].
//!
//! Keeps documents in insertion order behind a mutex and counts every call,
//! which makes it usable both as a local development backend and as a test
//! double for the upsert rules.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::error::ApiError;
use crate::store::TrendingStore;
use crate::types::{NewTrendingEntry, TrendingEntry};

/// Number of calls made against an [`InMemoryStore`], per operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCalls {
    pub find_by_term: u64,
    pub create: u64,
    pub update_count: u64,
    pub list_top: u64,
}

/// Mutex-guarded vector of trending documents.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: Mutex<Vec<TrendingEntry>>,
    calls: Mutex<StoreCalls>,
    next_id: AtomicU64,
}

impl InMemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `entries`, kept in the given order.
    pub fn with_entries(entries: Vec<TrendingEntry>) -> Self {
        let store = Self::default();
        if let Ok(mut guard) = store.entries.lock() {
            *guard = entries;
        }
        store
    }

    /// Snapshot of all documents in insertion order.
    pub fn entries(&self) -> Vec<TrendingEntry> {
        self.entries
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Snapshot of the call counters.
    pub fn calls(&self) -> StoreCalls {
        self.calls.lock().map(|guard| *guard).unwrap_or_default()
    }

    fn record(&self, bump: impl FnOnce(&mut StoreCalls)) {
        if let Ok(mut guard) = self.calls.lock() {
            bump(&mut guard);
        }
    }

    fn lock_entries(&self) -> Result<std::sync::MutexGuard<'_, Vec<TrendingEntry>>, ApiError> {
        self.entries
            .lock()
            .map_err(|_| ApiError::Http("in-memory store lock poisoned".into()))
    }
}

impl TrendingStore for InMemoryStore {
    async fn find_by_term(&self, term: &str) -> Result<Vec<TrendingEntry>, ApiError> {
        self.record(|c| c.find_by_term += 1);
        let entries = self.lock_entries()?;
        Ok(entries
            .iter()
            .filter(|e| e.search_term == term)
            .cloned()
            .collect())
    }

    async fn create(&self, entry: NewTrendingEntry) -> Result<TrendingEntry, ApiError> {
        self.record(|c| c.create += 1);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let created = entry.into_entry(format!("mem-{id}"));
        self.lock_entries()?.push(created.clone());
        Ok(created)
    }

    async fn update_count(&self, document_id: &str, count: i64) -> Result<TrendingEntry, ApiError> {
        self.record(|c| c.update_count += 1);
        let mut entries = self.lock_entries()?;
        let entry = entries
            .iter_mut()
            .find(|e| e.document_id == document_id)
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: format!("document {document_id} not found"),
            })?;
        entry.count = count;
        Ok(entry.clone())
    }

    async fn list_top(&self, limit: usize) -> Result<Vec<TrendingEntry>, ApiError> {
        self.record(|c| c.list_top += 1);
        let mut entries = self.lock_entries()?.clone();
        // Stable sort: equal counts keep insertion order.
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        entries.truncate(limit);
        Ok(entries)
    }
}
