//! Error types for the evidex core.
//!
//! Uses `thiserror` for public API error types. Search and suggestion failures
//! are always recoverable: the session reverts to idle and keeps whatever it was
//! displaying before.

use std::path::PathBuf;

/// Top-level error type for the evidex core library.
#[derive(Debug, thiserror::Error)]
pub enum EvidexError {
    #[error("Search error: {0}")]
    Search(#[from] SearchFailure),

    #[error("Suggestion error: {0}")]
    Suggestion(#[from] SuggestionFailure),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure of a single `search` call against the evidence service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchFailure {
    #[error("Search request failed: {message}")]
    Request { message: String },

    #[error("Evidence service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Search timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Search response parse error: {message}")]
    Parse { message: String },

    #[error("Malformed search result: {message}")]
    Malformed { message: String },
}

/// Failure of a `suggest` call. Never shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SuggestionFailure {
    #[error("Suggestion request failed: {message}")]
    Request { message: String },

    #[error("Suggestion response parse error: {message}")]
    Parse { message: String },
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

/// A type alias for results using the top-level `EvidexError`.
pub type Result<T> = std::result::Result<T, EvidexError>;
