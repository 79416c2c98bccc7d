//! # marquee-api
//!
//! Typed async clients for the two services behind Marquee.
//!
//! - [`TmdbClient`] lists movies from TMDB: free-text search, or the
//!   popularity-sorted discover list when the query is empty.
//! - [`AppwriteStore`] reads and writes trending-search counters in an
//!   Appwrite collection.
//! - [`InMemoryStore`] implements the same document operations in process.
//!
//! Both service seams are traits ([`MovieSource`], [`TrendingStore`]) so the
//! application can be driven by test doubles.
//!
//! ## Security
//!
//! - API keys are injected through [`MetadataConfig`] / [`StoreConfig`] and
//!   never appear in `Debug` output or error messages
//! - Queries are logged only at debug level

pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod metadata;
pub mod store;
pub mod types;

pub use config::{MetadataConfig, StoreConfig};
pub use error::{ApiError, Result};
pub use memory::{InMemoryStore, StoreCalls};
pub use metadata::{MovieQuery, MovieSource, TmdbClient};
pub use store::{AppwriteStore, TrendingStore};
pub use types::{Movie, MovieListOutcome, MovieListResponse, NewTrendingEntry, TrendingEntry};
