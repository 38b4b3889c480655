// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - search: find link paths from one article to another
// - links:  print the (deduplicated, merged) links of some articles
//
// The API settings are global flags so both subcommands share them.
// =============================================================================

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use wiki_pathfinder::config::{
    SearchConfig, DEFAULT_API_URL, DEFAULT_BATCH_SIZE, DEFAULT_CONCURRENCY, DEFAULT_LINK_LIMIT,
    DEFAULT_MAX_DEPTH, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};

#[derive(Parser, Debug)]
#[command(
    name = "wiki-pathfinder",
    version,
    about = "Find chains of links between two Wikipedia articles",
    long_about = "wiki-pathfinder walks Wikipedia's link graph breadth-first from one article \
                  and reports every path that reaches the target article within a depth limit."
)]
pub struct Cli {
    #[command(flatten)]
    pub api: ApiArgs,

    /// Log progress to stderr (same as RUST_LOG=wiki_pathfinder=debug)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Settings for talking to the MediaWiki API
#[derive(Args, Debug)]
pub struct ApiArgs {
    /// MediaWiki api.php endpoint
    #[arg(long, env = "WIKI_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Titles per API request (the API allows 50 for anonymous clients)
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE, global = true)]
    pub batch_size: usize,

    /// Links per page per response (pllimit)
    #[arg(long, default_value_t = DEFAULT_LINK_LIMIT, global = true)]
    pub link_limit: usize,

    /// Batches fetched at the same time
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY, global = true)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout_secs: u64,

    /// Only follow links in this namespace (0 = articles)
    #[arg(long, global = true)]
    pub namespace: Option<i64>,

    #[arg(long, default_value = DEFAULT_USER_AGENT, global = true)]
    pub user_agent: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find link paths from one article to another
    ///
    /// Example: wiki-pathfinder search "Vince Vaughn" "Jennifer Aniston" --max-depth 2
    Search {
        /// Article to start from
        initial_title: String,

        /// Article to reach (matched case-insensitively)
        target_title: String,

        /// Levels explored below the starting article's own links
        ///
        /// 0 = only check the articles the start links to
        /// 1 = also check the articles those link to
        /// etc.
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,

        /// Stop at the first level that produces a path
        #[arg(long)]
        shortest: bool,

        /// Output results in JSON format instead of a list
        #[arg(long)]
        json: bool,
    },

    /// Print the outgoing links of one or more articles
    ///
    /// A page's links to itself are left out.
    ///
    /// Example: wiki-pathfinder links "Vince Vaughn" "Rust (programming language)"
    Links {
        /// Article titles
        #[arg(required = true)]
        titles: Vec<String>,

        /// Output results in JSON format
        #[arg(long)]
        json: bool,
    },
}

impl ApiArgs {
    // Builds the library config; search-only fields keep their defaults
    pub fn to_config(&self) -> SearchConfig {
        SearchConfig {
            api_url: self.api_url.clone(),
            batch_size: self.batch_size,
            link_limit: self.link_limit,
            concurrency: self.concurrency,
            timeout: Duration::from_secs(self.timeout_secs),
            namespace: self.namespace,
            user_agent: self.user_agent.clone(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_defaults() {
        let cli = Cli::parse_from([
            "wiki-pathfinder",
            "search",
            "Vince Vaughn",
            "Jennifer Aniston",
        ]);
        match cli.command {
            Commands::Search {
                initial_title,
                target_title,
                max_depth,
                shortest,
                json,
            } => {
                assert_eq!(initial_title, "Vince Vaughn");
                assert_eq!(target_title, "Jennifer Aniston");
                assert_eq!(max_depth, 2);
                assert!(!shortest);
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.api.batch_size, 50);
    }

    #[test]
    fn test_global_api_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "wiki-pathfinder",
            "links",
            "A",
            "--batch-size",
            "10",
            "--namespace",
            "0",
        ]);
        let config = cli.api.to_config();
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.namespace, Some(0));
    }

    #[test]
    fn test_links_requires_a_title() {
        assert!(Cli::try_parse_from(["wiki-pathfinder", "links"]).is_err());
    }
}
