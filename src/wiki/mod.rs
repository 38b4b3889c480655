// src/wiki/mod.rs
// =============================================================================
// This module gets link lists out of Wikipedia.
//
// Submodules:
// - api: one request/response round trip against the MediaWiki API
// - repository: batching, continuation, caching and pruning on top of it
// =============================================================================

mod api;
mod repository;

pub use api::{
    parse_response, ApiPage, Continuation, LinkQuery, LinkSource, QueryResult, WikipediaApi,
};
pub use repository::{PageRepository, Resolution};
