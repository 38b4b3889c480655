// src/error.rs
// =============================================================================
// Error types for the path search library.
//
// Only two kinds of error ever reach a caller of `PathSearch::run`:
// - Config: the search settings are unusable (checked before any request)
// - RootUnresolved: the starting article could not be fetched at all
//
// Everything else (HTTP failures, bad JSON, API error objects) is caught by
// the page repository and turned into an "unresolved" title for that run.
// =============================================================================

use thiserror::Error;

/// Errors produced by the search engine and its transport.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid search settings.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network or client-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("API returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// The response body was not the JSON we expected.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API answered with an `error` object.
    #[error("API error {code}: {info}")]
    Api { code: String, info: String },

    /// Endpoint URL could not be parsed.
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    /// The initial title could not be resolved, so there is nothing to search.
    #[error("Could not resolve initial page '{title}': {reason}")]
    RootUnresolved { title: String, reason: String },
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;
