//! Error types for threadpull.
//!
//! Library crates use [`ThreadpullError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! The taxonomy follows the collection engine's propagation policy:
//! per-item extraction failures are absorbed where they occur and never
//! surface here; pass exhaustion is a normal return, not an error; only
//! session-fatal and I/O-level conditions become a [`ThreadpullError`].

use std::path::PathBuf;

/// Top-level error type for all threadpull operations.
#[derive(Debug, thiserror::Error)]
pub enum ThreadpullError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// The browser session is unusable (WebDriver failure, login rejected,
    /// session destroyed mid-run). Always fatal for the run.
    #[error("session error: {0}")]
    Session(String),

    /// The enrichment API rejected a request.
    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Network/HTTP transport error.
    #[error("network error: {0}")]
    Network(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (schema mismatch, invalid format, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ThreadpullError>;

impl ThreadpullError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a session-fatal error from any displayable message.
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = ThreadpullError::config("missing query expression");
        assert_eq!(err.to_string(), "config error: missing query expression");

        let err = ThreadpullError::session("login rejected");
        assert_eq!(err.to_string(), "session error: login rejected");

        let err = ThreadpullError::Api {
            status: 429,
            message: "rate limited".into(),
        };
        assert!(err.to_string().contains("429"));
    }
}
