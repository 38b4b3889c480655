// src/config.rs
// =============================================================================
// Settings shared by the transport, the page repository and the search loop.
//
// The defaults mirror what the MediaWiki API allows anonymous clients to do:
// - at most 50 titles per query
// - at most 500 links per page per response (pllimit)
// =============================================================================

use std::time::Duration;

use crate::error::{Error, Result};

/// English Wikipedia's API endpoint.
pub const DEFAULT_API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// Titles per query the API accepts without extra rights.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Links per page returned by one response.
pub const DEFAULT_LINK_LIMIT: usize = 500;

pub const DEFAULT_MAX_DEPTH: usize = 2;
pub const DEFAULT_CONCURRENCY: usize = 4;
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

pub const DEFAULT_USER_AGENT: &str = concat!(
    "wiki-pathfinder/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/vswaroop04/wiki-pathfinder)"
);

/// Everything a search run needs to know.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// MediaWiki `api.php` endpoint.
    pub api_url: String,
    /// Number of levels explored below the root's own links.
    /// 0 means "only look at the pages the root links to".
    pub max_depth: usize,
    /// Maximum titles per API query.
    pub batch_size: usize,
    /// `pllimit`: links per page per response.
    pub link_limit: usize,
    /// Batches fetched at the same time.
    pub concurrency: usize,
    /// Per-request timeout handed to the HTTP client.
    pub timeout: Duration,
    /// Only follow links in this namespace (0 = articles). `None` follows all.
    pub namespace: Option<i64>,
    /// Stop after the first level that produced a path.
    pub stop_at_first_match: bool,
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            batch_size: DEFAULT_BATCH_SIZE,
            link_limit: DEFAULT_LINK_LIMIT,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            namespace: None,
            stop_at_first_match: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl SearchConfig {
    /// Rejects settings that would make the search loop or batching misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::Config("batch size must be at least 1".to_string()));
        }
        if self.link_limit == 0 {
            return Err(Error::Config("link limit must be at least 1".to_string()));
        }
        if self.concurrency == 0 {
            return Err(Error::Config("concurrency must be at least 1".to_string()));
        }
        url::Url::parse(&self.api_url)
            .map_err(|e| Error::Config(format!("invalid API URL '{}': {}", self.api_url, e)))?;
        Ok(())
    }
}
