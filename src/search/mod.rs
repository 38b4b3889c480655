// src/search/mod.rs
// =============================================================================
// This module finds link paths between two pages.
//
// Submodules:
// - node: PageNode, a page plus a pointer back to where we came from
// - expand: one breadth-first step over a whole frontier
// - driver: the depth-bounded search loop
// - path: rebuilding root-to-target routes from matched nodes
// =============================================================================

mod driver;
mod expand;
mod node;
mod path;

pub use driver::{PathSearch, SearchReport};
pub use expand::expand;
pub use node::PageNode;
pub use path::{reconstruct, Path, PathSummary};
