// src/search/driver.rs
// =============================================================================
// The breadth-first search loop.
//
// How it works:
// 1. Resolve the initial title into the root node (fatal if that fails)
// 2. For each level 0..=max_depth:
//    - expand the whole frontier (all fetches finish before anything else)
//    - scan the new frontier for pages titled like the target
//    - rebuild the path of every match
// 3. Stop early when a level has no pages left to expand
//
// With max_depth = 0 only the pages the root links to are checked, so the
// longest possible path has max_depth + 2 pages.
//
// Rust concepts:
// - `run(self)`: the search consumes itself, so its cache lives for exactly
//   one run
// =============================================================================

use std::sync::Arc;

use tracing::{info, warn};

use super::expand::expand;
use super::node::PageNode;
use super::path::{reconstruct, Path};
use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::wiki::{LinkSource, PageRepository, Resolution};

/// What a finished search hands back.
#[derive(Debug)]
pub struct SearchReport {
    /// Every path found, in discovery order.
    pub paths: Vec<Path>,
    /// Levels actually expanded.
    pub levels: usize,
    /// API round trips made during the run.
    pub network_requests: usize,
    /// Distinct titles resolved (or given up on) during the run.
    pub pages_seen: usize,
}

/// One search run over a link source.
pub struct PathSearch<S> {
    repo: PageRepository<S>,
    max_depth: usize,
    stop_at_first_match: bool,
}

impl<S: LinkSource> PathSearch<S> {
    pub fn new(source: S, config: &SearchConfig) -> Self {
        Self {
            repo: PageRepository::new(source, config),
            max_depth: config.max_depth,
            stop_at_first_match: config.stop_at_first_match,
        }
    }

    pub async fn run(mut self, initial_title: &str, target_title: &str) -> Result<SearchReport> {
        let root = self.resolve_root(initial_title).await?;
        let target = target_title.to_lowercase();

        info!(
            root = root.title(),
            target = target_title,
            max_depth = self.max_depth,
            "Starting search"
        );

        // Level 0 expands the root alone
        let mut frontier = vec![root];
        let mut paths: Vec<Path> = Vec::new();
        let mut levels = 0;

        for level in 0..=self.max_depth {
            // Every fetch of this level finishes before the scan starts
            let next = expand(&mut self.repo, &frontier).await;
            levels += 1;

            // Each matching node yields one path, walked back to the root
            let before = paths.len();
            paths.extend(
                next.iter()
                    .filter(|node| node.matches(&target))
                    .map(reconstruct),
            );
            let found = paths.len() - before;

            info!(level, pages = next.len(), found, "Level complete");

            // Nothing left to expand: deeper levels would be empty too
            if next.is_empty() {
                break;
            }
            if found > 0 && self.stop_at_first_match {
                break;
            }
            // Matched pages are expanded like any other page
            frontier = next;
        }

        Ok(SearchReport {
            paths,
            levels,
            network_requests: self.repo.network_requests(),
            pages_seen: self.repo.cache_len(),
        })
    }

    async fn resolve_root(&mut self, title: &str) -> Result<Arc<PageNode>> {
        match self.repo.fetch_link(title).await {
            Resolution::Resolved { id, title, links } => Ok(PageNode::root(id, title, links)),
            Resolution::Unresolved { reason } => {
                warn!("Initial page '{}' could not be resolved: {}", title, reason);
                Err(Error::RootUnresolved {
                    title: title.to_string(),
                    reason,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::PathSummary;
    use crate::testing::FakeWiki;

    fn config(max_depth: usize) -> SearchConfig {
        SearchConfig {
            max_depth,
            ..Default::default()
        }
    }

    fn summaries(report: &SearchReport) -> Vec<Vec<String>> {
        report
            .paths
            .iter()
            .map(|p| PathSummary::from(p).titles)
            .collect()
    }

    #[tokio::test]
    async fn test_direct_link_found_at_depth_zero() {
        let wiki = FakeWiki::new().page("A", &["B"]).page("B", &[]);
        let report = PathSearch::new(wiki, &config(0)).run("A", "B").await.unwrap();

        assert_eq!(summaries(&report), vec![vec!["A", "B"]]);
        assert_eq!(report.levels, 1);
    }

    #[tokio::test]
    async fn test_no_path_within_bound_is_empty() {
        let wiki = FakeWiki::new()
            .page("A", &["B"])
            .page("B", &["C"])
            .page("C", &["D"])
            .page("D", &["Z"]);
        let report = PathSearch::new(wiki, &config(2)).run("A", "Z").await.unwrap();

        assert!(report.paths.is_empty());
        assert_eq!(report.levels, 3);
    }

    #[tokio::test]
    async fn test_unresolved_branch_does_not_abort() {
        let wiki = FakeWiki::new()
            .page("A", &["B", "C"])
            .page("C", &["D"])
            .failing("B");
        let config = SearchConfig {
            max_depth: 1,
            batch_size: 1,
            ..Default::default()
        };

        let report = PathSearch::new(wiki, &config).run("A", "D").await.unwrap();
        assert_eq!(summaries(&report), vec![vec!["A", "C", "D"]]);
    }

    #[tokio::test]
    async fn test_self_link_never_leads_back_to_root() {
        let wiki = FakeWiki::new().page("A", &["A", "B"]).page("B", &["A"]);
        let report = PathSearch::new(wiki, &config(2)).run("A", "A").await.unwrap();
        assert!(report.paths.is_empty());
    }

    #[tokio::test]
    async fn test_target_match_ignores_case() {
        let wiki = FakeWiki::new().page("A", &["Jennifer Aniston"]);
        let report = PathSearch::new(wiki, &config(0))
            .run("A", "jennifer ANISTON")
            .await
            .unwrap();
        assert_eq!(summaries(&report), vec![vec!["A", "Jennifer Aniston"]]);
    }

    #[tokio::test]
    async fn test_distinct_routes_are_all_reported() {
        let wiki = FakeWiki::new()
            .page("A", &["B", "C"])
            .page("B", &["T"])
            .page("C", &["T"]);
        let report = PathSearch::new(wiki, &config(1)).run("A", "T").await.unwrap();

        assert_eq!(
            summaries(&report),
            vec![vec!["A", "B", "T"], vec!["A", "C", "T"]]
        );
    }

    #[tokio::test]
    async fn test_matches_on_more_than_one_level_are_all_reported() {
        // B and T are fetched in the same call; B must keep its link to T
        let wiki = FakeWiki::new()
            .page("A", &["B", "T"])
            .page("B", &["T"])
            .page("T", &[]);
        let report = PathSearch::new(wiki, &config(1)).run("A", "T").await.unwrap();

        assert_eq!(
            summaries(&report),
            vec![vec!["A", "T"], vec!["A", "B", "T"]]
        );
        assert_eq!(report.levels, 2);
    }

    #[tokio::test]
    async fn test_paths_start_at_root_end_at_target_within_bound() {
        let max_depth = 2;
        let wiki = FakeWiki::new()
            .page("A", &["B", "C"])
            .page("B", &["D", "T"])
            .page("C", &["T"])
            .page("D", &["T"])
            .normalize("a", "A");
        let report = PathSearch::new(wiki, &config(max_depth))
            .run("a", "t")
            .await
            .unwrap();

        assert!(!report.paths.is_empty());
        for path in &report.paths {
            assert!(path.len() <= max_depth + 2);
            assert_eq!(path[0].title().to_lowercase(), "a");
            assert!(path[0].is_root());
            assert_eq!(path[path.len() - 1].title().to_lowercase(), "t");
        }
    }

    #[tokio::test]
    async fn test_each_title_fetched_once_per_run() {
        let wiki = FakeWiki::new()
            .page("A", &["B", "C"])
            .page("B", &["C", "D"])
            .page("C", &["D"])
            .page("D", &["A"]);
        let search = PathSearch::new(wiki, &config(3));
        let report = search.run("A", "nothing").await.unwrap();

        // root, {B, C}, {D}; D's only link points back at A
        assert_eq!(report.network_requests, 3);
        assert_eq!(report.pages_seen, 4);
    }

    #[tokio::test]
    async fn test_stop_at_first_match_skips_deeper_levels() {
        let build = || {
            FakeWiki::new()
                .page("A", &["B"])
                .page("B", &["T"])
                .page("T", &["X"])
                .page("X", &["Y"])
        };

        let full = PathSearch::new(build(), &config(3)).run("A", "T").await.unwrap();
        assert_eq!(full.paths.len(), 1);
        assert_eq!(full.network_requests, 5);

        let config = SearchConfig {
            max_depth: 3,
            stop_at_first_match: true,
            ..Default::default()
        };
        let early = PathSearch::new(build(), &config).run("A", "T").await.unwrap();
        assert_eq!(early.paths.len(), 1);
        assert_eq!(early.network_requests, 3);
        assert_eq!(early.levels, 2);
    }

    #[tokio::test]
    async fn test_missing_root_is_fatal() {
        let err = PathSearch::new(FakeWiki::default(), &config(2))
            .run("Nowhere", "B")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::RootUnresolved { ref title, .. } if title == "Nowhere"));
    }

    #[tokio::test]
    async fn test_root_transport_failure_is_fatal() {
        let wiki = FakeWiki::new().page("A", &["B"]).failing("A");
        let err = PathSearch::new(wiki, &config(2)).run("A", "B").await.unwrap_err();
        assert!(matches!(err, Error::RootUnresolved { .. }));
    }
}
