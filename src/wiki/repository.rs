// src/wiki/repository.rs
// =============================================================================
// The page repository: "give me the links of these titles".
//
// What it takes care of:
// 1. Dedup the requested titles and answer cached ones without a request
// 2. Split the rest into batches the API accepts (50 titles by default)
// 3. Fetch batches concurrently; inside one batch, follow "continue" tokens
//    one round trip at a time and merge the link fragments per page
// 4. Turn a failed batch into "unresolved" titles instead of an error
// 5. Drop links to titles already visited in this run, then cache
//
// One repository == one search run. The cache is never shared between runs.
//
// Rust concepts:
// - Generics: PageRepository<S> works with any LinkSource
// - &mut self: the only way to write the cache, so each title is
//   checked-then-written in one step even while batches run concurrently
// =============================================================================

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use super::api::{ApiPage, Continuation, LinkQuery, LinkSource};
use crate::config::SearchConfig;
use crate::error::{Error, Result};

/// What a title turned into for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Links were fetched. `title` is the canonical title reported by the API.
    Resolved {
        id: Option<u64>,
        title: String,
        links: Vec<String>,
    },
    /// The title could not be fetched; it behaves as a page without links.
    Unresolved { reason: String },
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved { .. })
    }

    /// Links of a resolved page, empty for an unresolved one.
    pub fn links(&self) -> &[String] {
        match self {
            Resolution::Resolved { links, .. } => links,
            Resolution::Unresolved { .. } => &[],
        }
    }

    pub fn id(&self) -> Option<u64> {
        match self {
            Resolution::Resolved { id, .. } => *id,
            Resolution::Unresolved { .. } => None,
        }
    }
}

// A page's link list being assembled from continuation fragments
#[derive(Debug, Default)]
struct MergedPage {
    id: Option<u64>,
    missing: bool,
    links: Vec<String>,
    seen: HashSet<String>,
}

// Everything one batch returned, across all of its continuation pages
#[derive(Debug, Default)]
struct BatchPages {
    pages: HashMap<String, MergedPage>,
    normalized: HashMap<String, String>,
}

impl BatchPages {
    fn absorb(&mut self, pages: Vec<ApiPage>, normalized: Vec<(String, String)>) {
        self.normalized.extend(normalized);

        for page in pages {
            let merged = self.pages.entry(page.title).or_default();
            if merged.id.is_none() {
                merged.id = page.id;
            }
            merged.missing |= page.missing;
            for link in page.links {
                if merged.seen.insert(link.clone()) {
                    merged.links.push(link);
                }
            }
        }
    }

    fn canonical<'a>(&'a self, title: &'a str) -> &'a str {
        self.normalized.get(title).map(String::as_str).unwrap_or(title)
    }

    // `known` holds the titles cached before this call; the page itself is
    // pruned too, under both its requested and canonical title
    fn resolve(&self, title: &str, known: &HashSet<String>) -> Resolution {
        let canonical = self.canonical(title);
        let visited =
            |link: &String| known.contains(link) || link == title || link == canonical;
        match self.pages.get(canonical) {
            None => Resolution::Unresolved {
                reason: "not returned by the API".to_string(),
            },
            Some(page) if page.missing => Resolution::Unresolved {
                reason: "page does not exist".to_string(),
            },
            Some(page) => Resolution::Resolved {
                id: page.id,
                title: canonical.to_string(),
                links: page
                    .links
                    .iter()
                    .filter(|link| !visited(*link))
                    .cloned()
                    .collect(),
            },
        }
    }
}

/// Fetches and caches link lists for one search run.
pub struct PageRepository<S> {
    source: S,
    cache: HashMap<String, Resolution>,
    batch_size: usize,
    concurrency: usize,
    requests: AtomicUsize,
}

impl<S: LinkSource> PageRepository<S> {
    pub fn new(source: S, config: &SearchConfig) -> Self {
        Self {
            source,
            cache: HashMap::new(),
            batch_size: config.batch_size.max(1),
            concurrency: config.concurrency.max(1),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Round trips issued so far, continuation pages included.
    pub fn network_requests(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn cached(&self, title: &str) -> Option<&Resolution> {
        self.cache.get(title)
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Resolves a single title.
    pub async fn fetch_link(&mut self, title: &str) -> Resolution {
        let mut resolved = self.fetch_links(&[title.to_string()]).await;
        resolved
            .remove(title)
            .unwrap_or_else(|| Resolution::Unresolved {
                reason: "not returned by the repository".to_string(),
            })
    }

    /// Resolves every title in `titles`; the returned map has one entry per
    /// distinct title. Never fails: fetch errors become `Unresolved`.
    pub async fn fetch_links(&mut self, titles: &[String]) -> HashMap<String, Resolution> {
        let mut seen = HashSet::new();
        let requested: Vec<String> = titles
            .iter()
            .filter(|t| seen.insert(*t))
            .cloned()
            .collect();

        let missing: Vec<String> = requested
            .iter()
            .filter(|t| !self.cache.contains_key(t.as_str()))
            .cloned()
            .collect();

        debug!(
            requested = requested.len(),
            cache_hits = requested.len() - missing.len(),
            "Resolving titles"
        );

        if !missing.is_empty() {
            self.fetch_uncached(missing).await;
        }

        requested
            .into_iter()
            .filter_map(|title| {
                let resolution = self.cache.get(&title)?.clone();
                Some((title, resolution))
            })
            .collect()
    }

    async fn fetch_uncached(&mut self, missing: Vec<String>) {
        // Snapshot before anything is written, so pruning depends only on
        // what earlier calls resolved
        let known: HashSet<String> = self.cache.keys().cloned().collect();

        let batches: Vec<Vec<String>> = missing
            .chunks(self.batch_size)
            .map(<[String]>::to_vec)
            .collect();

        info!(
            titles = missing.len(),
            batches = batches.len(),
            "Fetching links from the API"
        );

        let source = &self.source;
        let requests = &self.requests;

        // Batches are disjoint, so they can run side by side. `buffered`
        // keeps results in batch order, which keeps the merge deterministic.
        let outcomes: Vec<(Vec<String>, Result<BatchPages>)> = stream::iter(batches)
            .map(|batch| async move {
                let outcome = fetch_batch(source, requests, &batch).await;
                (batch, outcome)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        for (batch, outcome) in outcomes {
            match outcome {
                Ok(pages) => {
                    for title in batch {
                        let resolution = pages.resolve(&title, &known);
                        if let Resolution::Unresolved { reason } = &resolution {
                            debug!("Unresolved '{}': {}", title, reason);
                        }
                        let canonical = pages.canonical(&title).to_string();
                        if canonical != title {
                            self.cache
                                .entry(canonical)
                                .or_insert_with(|| resolution.clone());
                        }
                        self.cache.insert(title, resolution);
                    }
                }
                Err(e) => {
                    warn!(titles = batch.len(), "Batch failed: {}", e);
                    let reason = e.to_string();
                    for title in batch {
                        self.cache.insert(
                            title,
                            Resolution::Unresolved {
                                reason: reason.clone(),
                            },
                        );
                    }
                }
            }
        }
    }
}

// Fetches one batch, following continuation tokens until the API stops
// sending them
async fn fetch_batch<S: LinkSource>(
    source: &S,
    requests: &AtomicUsize,
    titles: &[String],
) -> Result<BatchPages> {
    let base = LinkQuery::new(titles.to_vec());
    let mut query = base.clone();
    let mut merged = BatchPages::default();
    let mut sent: HashSet<Continuation> = HashSet::new();

    loop {
        requests.fetch_add(1, Ordering::Relaxed);
        let result = source.query(&query).await?;
        merged.absorb(result.pages, result.normalized);

        match result.continuation {
            None => break,
            Some(next) => {
                // Any token seen before in this batch means the API is cycling
                if !sent.insert(next.clone()) {
                    return Err(Error::Api {
                        code: "continuation-loop".to_string(),
                        info: "API repeated an earlier continue token".to_string(),
                    });
                }
                debug!(?next, "Following continuation");
                query = base.continued(next);
            }
        }
    }

    Ok(merged)
}
