//! Wire types for movie listings and trending-search documents.

use serde::{Deserialize, Deserializer, Serialize};

/// A movie record as returned by the metadata service.
///
/// Only the fields the application reads are typed; everything else is
/// kept verbatim in `extra`. Movies are never mutated locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub original_language: Option<String>,
    /// Untyped remainder of the record.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Movie {
    /// Minimal constructor, mostly for fixtures.
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path: None,
            overview: None,
            release_date: None,
            vote_average: None,
            original_language: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Set the poster path.
    pub fn with_poster_path(mut self, path: impl Into<String>) -> Self {
        self.poster_path = Some(path.into());
        self
    }

    /// Absolute poster URL under `image_base_url`, if the movie has a poster.
    pub fn poster_url(&self, image_base_url: &str) -> Option<String> {
        self.poster_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| format!("{}{}", image_base_url.trim_end_matches('/'), p))
    }

    /// Four-digit release year, when the release date is known.
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .filter(|y| y.chars().all(|c| c.is_ascii_digit()))
    }
}

/// Body of a `search/movie` or `discover/movie` response.
///
/// Besides `results`, two failure envelopes are recognised: the
/// `Response: "False"` + `Error` pair and TMDB's `success: false` +
/// `status_message`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieListResponse {
    #[serde(default)]
    pub results: Vec<Movie>,
    #[serde(rename = "Response", default, deserialize_with = "deserialize_flag")]
    pub response: Option<bool>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub status_message: Option<String>,
}

/// Classified content of a successful metadata response.
#[derive(Debug, Clone, PartialEq)]
pub enum MovieListOutcome {
    /// The service returned a (possibly empty) result list.
    Results(Vec<Movie>),
    /// The service signalled a logical failure, with its message if any.
    Failure(Option<String>),
}

impl MovieListResponse {
    /// Split the response into results or a domain-level failure.
    pub fn into_outcome(self) -> MovieListOutcome {
        if self.response == Some(false) {
            return MovieListOutcome::Failure(non_empty(self.error));
        }
        if self.success == Some(false) {
            return MovieListOutcome::Failure(non_empty(self.status_message));
        }
        MovieListOutcome::Results(self.results)
    }
}

fn non_empty(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.trim().is_empty())
}

/// Accept the response flag as a JSON bool or as a `"True"`/`"False"` string.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Bool(flag)) => Some(flag),
        Some(serde_json::Value::String(s)) => Some(!s.trim().eq_ignore_ascii_case("false")),
        _ => None,
    })
}

/// A stored trending-search counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingEntry {
    #[serde(rename = "$id")]
    pub document_id: String,
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    pub count: i64,
    pub movie_id: i64,
    pub poster_url: String,
}

/// Payload for creating a trending document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTrendingEntry {
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    pub count: i64,
    pub movie_id: i64,
    pub poster_url: String,
}

impl NewTrendingEntry {
    /// Materialise the entry under a store-assigned document id.
    pub fn into_entry(self, document_id: impl Into<String>) -> TrendingEntry {
        TrendingEntry {
            document_id: document_id.into(),
            search_term: self.search_term,
            count: self.count,
            movie_id: self.movie_id,
            poster_url: self.poster_url,
        }
    }
}

/// Envelope of an Appwrite document listing.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentList<T> {
    pub documents: Vec<T>,
}
