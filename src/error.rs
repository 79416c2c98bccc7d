//! Error types for the marquee application core.

use marquee_api::ApiError;

/// Top-level error type for the movie discovery core.
#[derive(Debug, thiserror::Error)]
pub enum MarqueeError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Movie API or document store error.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, MarqueeError>;

/// Failure of a background side effect.
///
/// Side-effect errors are logged and may be observed through a sink, but
/// never change the search state shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SideEffectError {
    /// Recording a successful search in the trending store failed.
    #[error("failed to record trending search {term:?}: {message}")]
    RecordSearch { term: String, message: String },

    /// Loading the trending list failed.
    #[error("failed to load trending searches: {0}")]
    LoadTrending(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_convert() {
        let err: MarqueeError = ApiError::Http("connection refused".into()).into();
        assert_eq!(err.to_string(), "API error: HTTP error: connection refused");
    }

    #[test]
    fn display_config() {
        let err = MarqueeError::Config("debounce_ms must be greater than 0".into());
        assert_eq!(err.to_string(), "config error: debounce_ms must be greater than 0");
    }

    #[test]
    fn display_side_effect_errors() {
        let err = SideEffectError::RecordSearch {
            term: "dune".into(),
            message: "HTTP error: timeout".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to record trending search \"dune\": HTTP error: timeout"
        );
        let err = SideEffectError::LoadTrending("HTTP 404: not found".into());
        assert_eq!(
            err.to_string(),
            "failed to load trending searches: HTTP 404: not found"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MarqueeError>();
    }
}
