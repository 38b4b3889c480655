// src/search/node.rs
// =============================================================================
// A page as seen by the search: its title, its links, and who led us here.
//
// Nodes are built once and never mutated. The parent pointer is set at
// construction, so the nodes of one search form a tree rooted at the
// initial page, even though Wikipedia's link graph is full of cycles.
//
// Rust concepts:
// - Arc<T>: shared ownership; many children point at the same parent
// =============================================================================

use std::sync::Arc;

use crate::wiki::Resolution;

#[derive(Debug)]
pub struct PageNode {
    id: Option<u64>,
    title: String,
    parent: Option<Arc<PageNode>>,
    links: Vec<String>,
    depth: usize,
}

impl PageNode {
    /// The initial page of a search.
    pub fn root(id: Option<u64>, title: impl Into<String>, links: Vec<String>) -> Arc<Self> {
        Arc::new(Self {
            id,
            title: title.into(),
            parent: None,
            links,
            depth: 0,
        })
    }

    // A page reached by following `title` from `parent`
    //
    // An unresolved page still becomes a node, just one without links.
    pub fn child(
        parent: &Arc<PageNode>,
        title: &str,
        resolution: Option<&Resolution>,
    ) -> Arc<Self> {
        let (id, links) = match resolution {
            Some(resolution) => (resolution.id(), resolution.links().to_vec()),
            None => (None, Vec::new()),
        };

        Arc::new(Self {
            id,
            title: title.to_string(),
            parent: Some(Arc::clone(parent)),
            links,
            depth: parent.depth + 1,
        })
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn parent(&self) -> Option<&Arc<PageNode>> {
        self.parent.as_ref()
    }

    pub fn links(&self) -> &[String] {
        &self.links
    }

    /// Hops from the root; the root is 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Case-insensitive title comparison. `lowercase_title` must already be
    /// lowercased.
    pub fn matches(&self, lowercase_title: &str) -> bool {
        self.title.to_lowercase() == lowercase_title
    }
}
