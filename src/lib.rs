//! Marquee: movie discovery core.
//!
//! Turns keystroke-level search input into movie listings and keeps a small
//! popularity index of successful searches:
//! raw input → debounce → search/discover fetch → classified state
//!
//! # Architecture
//!
//! - **Debounce**: [`QueryDebouncer`] commits the input after a quiet period
//! - **Orchestration**: [`SearchOrchestrator`] fetches, classifies and
//!   publishes [`SearchState`], discarding stale resolutions
//! - **Trending**: [`TrendingService`] counts successful searches and loads
//!   the top entries
//! - **Session**: [`SearchSession`] wires the pieces together for one user
//!
//! HTTP clients for the movie database and the document store live in the
//! `marquee-api` crate.

pub mod config;
pub mod debounce;
pub mod error;
pub mod orchestrator;
pub mod session;
pub mod state;
pub mod trending;

#[cfg(test)]
mod test_utils;

pub use config::{MarqueeConfig, SearchSettings};
pub use debounce::QueryDebouncer;
pub use error::{MarqueeError, Result, SideEffectError};
pub use orchestrator::SearchOrchestrator;
pub use session::SearchSession;
pub use state::{PhaseKind, SearchPhase, SearchState};
pub use trending::TrendingService;
