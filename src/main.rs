// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, RUST_LOG aware)
// 3. Dispatch to the appropriate subcommand handler
// 4. Print results and exit with a proper code
//    (0 = path found / links printed, 1 = no path, 2 = error)
//
// Rust concepts used:
// - async/await: every page fetch is a network round trip
// - Result<T, E> with `?`: errors bubble up to main, which turns them into
//   exit code 2
// - match: one branch per subcommand
// - struct update syntax (`..config`): override a few config fields
// =============================================================================

// src/cli.rs - command-line parsing; the search itself lives in the library
mod cli;

use std::collections::HashMap;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use serde::Serialize;
use wiki_pathfinder::config::SearchConfig;
use wiki_pathfinder::{PageRepository, PathSummary, Resolution, SearchReport, WikipediaApi};

#[tokio::main]
async fn main() {
    // Run the application and turn its outcome into an exit code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Unexpected error: print the whole context chain, exit with 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = path found / every title resolved
//   Ok(1) = no path / some title unresolved
//   Err = unexpected error (main maps it to 2)
async fn run() -> Result<i32> {
    // Parse command-line arguments; clap handles --help and --version
    let cli = Cli::parse();

    // Logs go to stderr so --json output on stdout stays clean
    wiki_pathfinder::logging::init_logging(cli.verbose);

    // Global API flags shared by both subcommands
    let config = cli.api.to_config();

    match cli.command {
        Commands::Search {
            initial_title,
            target_title,
            max_depth,
            shortest,
            json,
        } => {
            // Search-only settings override the shared defaults
            let config = SearchConfig {
                max_depth,
                stop_at_first_match: shortest,
                ..config
            };
            handle_search(&config, &initial_title, &target_title, json).await
        }
        Commands::Links { titles, json } => handle_links(&config, &titles, json).await,
    }
}

// Handles the 'search' subcommand
// Parameters:
//   initial_title: article the search starts from
//   target_title: article to reach, compared case-insensitively
//   json: whether to output JSON format
async fn handle_search(
    config: &SearchConfig,
    initial_title: &str,
    target_title: &str,
    json: bool,
) -> Result<i32> {
    // Human-readable banner, skipped in JSON mode
    if !json {
        println!("🔍 Searching from '{}' to '{}'", initial_title, target_title);
        println!("📊 Max depth: {}", config.max_depth);
    }

    // Validates the config, then runs the level-by-level search
    let report = wiki_pathfinder::find_paths(config, initial_title, target_title)
        .await
        .context("search failed")?;

    print_report(&report, json)?;

    // Exit code 1 when nothing was found within the depth limit
    if report.paths.is_empty() {
        Ok(1)
    } else {
        Ok(0)
    }
}

#[derive(Serialize)]
struct SearchOutput<'a> {
    paths: &'a [PathSummary],
    levels: usize,
    network_requests: usize,
    pages_seen: usize,
}

// Prints the found paths, either as pretty JSON or as a numbered list
fn print_report(report: &SearchReport, json: bool) -> Result<()> {
    // Paths hold nodes; summaries hold just the titles, ready to print
    let summaries: Vec<PathSummary> = report.paths.iter().map(PathSummary::from).collect();

    if json {
        let output = SearchOutput {
            paths: &summaries,
            levels: report.levels,
            network_requests: report.network_requests,
            pages_seen: report.pages_seen,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if summaries.is_empty() {
        println!("\n❌ No path found within the depth limit");
    } else {
        println!("\n✅ Found {} path(s):\n", summaries.len());
        for (i, summary) in summaries.iter().enumerate() {
            println!("{:>4}. {}", i + 1, summary.titles.join(" → "));
        }
    }

    println!();
    println!("📊 Summary:");
    println!("   📚 Levels expanded: {}", report.levels);
    println!("   📄 Pages resolved: {}", report.pages_seen);
    println!("   🌐 API requests: {}", report.network_requests);

    Ok(())
}

#[derive(Serialize)]
struct LinksOutput {
    title: String,
    resolved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    links: Vec<String>,
}

// Handles the 'links' subcommand
//
// Goes through the same repository as the search, so batching, continuation
// and the self-link pruning all apply.
async fn handle_links(config: &SearchConfig, titles: &[String], json: bool) -> Result<i32> {
    // Same checks find_paths does before touching the network
    config.validate()?;
    let api = WikipediaApi::new(config)?;
    let mut repo = PageRepository::new(api, config);

    // One call: titles are deduplicated and batched inside the repository
    let mut resolved: HashMap<String, Resolution> = repo.fetch_links(titles).await;

    // Keep the order the user gave, drop repeats
    let mut output = Vec::new();
    for title in titles {
        let Some(resolution) = resolved.remove(title) else {
            continue;
        };
        output.push(match resolution {
            Resolution::Resolved { title, links, .. } => LinksOutput {
                title,
                resolved: true,
                reason: None,
                links,
            },
            Resolution::Unresolved { reason } => LinksOutput {
                title: title.clone(),
                resolved: false,
                reason: Some(reason),
                links: Vec::new(),
            },
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        // One header line per title, then its links indented below
        for page in &output {
            match &page.reason {
                None => println!("📄 {} ({} links)", page.title, page.links.len()),
                Some(reason) => println!("⚠️  {} (unresolved: {})", page.title, reason),
            }
            for link in &page.links {
                println!("   {}", link);
            }
        }
    }

    // Any unresolved title makes the exit code 1
    let all_resolved = output.iter().all(|page| page.resolved);
    Ok(if all_resolved { 0 } else { 1 })
}
