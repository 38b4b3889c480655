// src/lib.rs
// =============================================================================
// wiki-pathfinder: find chains of links from one Wikipedia article to another.
//
// The search walks the live link graph breadth-first, a whole level at a
// time, asking the MediaWiki API for links in batches and caching every
// answer for the length of one run.
//
//   let config = SearchConfig::default();
//   let report = wiki_pathfinder::find_paths(&config, "Vince Vaughn", "Jennifer Aniston").await?;
//   for path in &report.paths { ... }
// =============================================================================

pub mod config;
pub mod error;
pub mod logging;
pub mod search;
pub mod wiki;

#[cfg(test)]
pub(crate) mod testing;

pub use config::SearchConfig;
pub use error::{Error, Result};
pub use search::{PageNode, Path, PathSearch, PathSummary, SearchReport};
pub use wiki::{LinkSource, PageRepository, Resolution, WikipediaApi};

/// Runs one search against the configured MediaWiki endpoint.
pub async fn find_paths(
    config: &SearchConfig,
    initial_title: &str,
    target_title: &str,
) -> Result<SearchReport> {
    config.validate()?;
    let api = WikipediaApi::new(config)?;
    PathSearch::new(api, config)
        .run(initial_title, target_title)
        .await
}
