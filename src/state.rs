//! Search state as an explicit phase machine.
//!
//! `Idle → Loading → {Success | EmptyResults | DomainError | TransportError}`,
//! and any terminal phase goes back to `Loading` on the next committed query.
//! Each phase carries only the data valid for it, so "loading with an error"
//! or "error with results" cannot be represented.

use marquee_api::Movie;

/// Phase of the search pipeline, tagged with the query it belongs to.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchPhase {
    /// Nothing dispatched yet.
    #[default]
    Idle,
    /// A request for `query` is in flight.
    Loading { query: String },
    /// Non-empty result list.
    Success { query: String, movies: Vec<Movie> },
    /// Valid response with zero matches. Not an error.
    EmptyResults { query: String },
    /// The service answered but reported a logical failure.
    DomainError { query: String, message: String },
    /// Network failure, failure status, or undecodable response.
    TransportError { query: String, message: String },
}

/// Coarse phase label, handy for logs and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Idle,
    Loading,
    Success,
    EmptyResults,
    DomainError,
    TransportError,
}

impl SearchPhase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Self::Idle => PhaseKind::Idle,
            Self::Loading { .. } => PhaseKind::Loading,
            Self::Success { .. } => PhaseKind::Success,
            Self::EmptyResults { .. } => PhaseKind::EmptyResults,
            Self::DomainError { .. } => PhaseKind::DomainError,
            Self::TransportError { .. } => PhaseKind::TransportError,
        }
    }

    /// The committed query this phase belongs to, if any.
    pub fn query(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Loading { query }
            | Self::Success { query, .. }
            | Self::EmptyResults { query }
            | Self::DomainError { query, .. }
            | Self::TransportError { query, .. } => Some(query),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// User-visible error text, for the two error phases.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::DomainError { message, .. } | Self::TransportError { message, .. } => {
                Some(message)
            }
            _ => None,
        }
    }

    /// Movies to render; empty outside [`SearchPhase::Success`].
    pub fn movies(&self) -> &[Movie] {
        match self {
            Self::Success { movies, .. } => movies,
            _ => &[],
        }
    }

    /// Whether this phase is a resolution of a dispatched search.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Idle | Self::Loading { .. })
    }
}

/// Snapshot published to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    /// Sequence number of the search that produced `phase`; 0 before any search.
    pub generation: u64,
    pub phase: SearchPhase,
}

impl SearchState {
    /// Committed query of the current phase, or empty before the first search.
    pub fn committed_query(&self) -> &str {
        self.phase.query().unwrap_or_default()
    }

    pub fn is_loading(&self) -> bool {
        self.phase.is_loading()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.phase.error_message()
    }

    pub fn movies(&self) -> &[Movie] {
        self.phase.movies()
    }
}
