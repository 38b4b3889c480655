// src/search/path.rs
// =============================================================================
// Turns a matched node back into the route that led to it.
// =============================================================================

use std::sync::Arc;

use serde::Serialize;

use super::node::PageNode;

/// Root first, matched page last.
pub type Path = Vec<Arc<PageNode>>;

// Walks parent pointers up to the root and returns the nodes root-first
pub fn reconstruct(node: &Arc<PageNode>) -> Path {
    let mut path = vec![Arc::clone(node)];
    let mut current = node.parent();

    while let Some(parent) = current {
        path.push(Arc::clone(parent));
        current = parent.parent();
    }

    path.reverse();
    path
}

/// A path reduced to what gets printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathSummary {
    pub titles: Vec<String>,
    /// Number of links followed.
    pub hops: usize,
}

impl From<&Path> for PathSummary {
    fn from(path: &Path) -> Self {
        let titles: Vec<String> = path.iter().map(|node| node.title().to_string()).collect();
        Self {
            hops: titles.len().saturating_sub(1),
            titles,
        }
    }
}
