// src/search/expand.rs
// =============================================================================
// One breadth-first step: frontier at depth d -> frontier at depth d+1.
//
// 1. Gather every link title of every node in the frontier (once each)
// 2. Resolve them all with a single repository call
// 3. Give each node one child per link, in link order
//
// The output order (frontier order, then link order) decides which path is
// reported first when several exist.
// =============================================================================

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use super::node::PageNode;
use crate::wiki::{LinkSource, PageRepository};

pub async fn expand<S: LinkSource>(
    repo: &mut PageRepository<S>,
    frontier: &[Arc<PageNode>],
) -> Vec<Arc<PageNode>> {
    let mut seen = HashSet::new();
    let titles: Vec<String> = frontier
        .iter()
        .flat_map(|node| node.links())
        .filter(|title| seen.insert(*title))
        .cloned()
        .collect();

    let resolved = repo.fetch_links(&titles).await;

    let mut next = Vec::new();
    for node in frontier {
        for link in node.links() {
            next.push(PageNode::child(node, link, resolved.get(link)));
        }
    }

    debug!(
        frontier = frontier.len(),
        distinct_links = titles.len(),
        children = next.len(),
        "Expanded level"
    );

    next
}
