// src/testing.rs
// =============================================================================
// In-memory link sources for unit tests.
//
// - FakeWiki: a small link graph that paginates like the real API
//   (a fixed number of links per page per response, "plcontinue" offsets)
// - ScriptedSource: replays a fixed list of responses, one per request
//
// Both record every query they receive so tests can count round trips.
// =============================================================================

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::wiki::{ApiPage, Continuation, LinkQuery, LinkSource, QueryResult};

pub struct FakeWiki {
    pages: HashMap<String, (u64, Vec<String>)>,
    failing: HashSet<String>,
    normalized: HashMap<String, String>,
    page_size: usize,
    queries: Mutex<Vec<LinkQuery>>,
}

impl Default for FakeWiki {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeWiki {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            failing: HashSet::new(),
            normalized: HashMap::new(),
            page_size: usize::MAX,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn page(mut self, title: &str, links: &[&str]) -> Self {
        let id = self.pages.len() as u64 + 1;
        self.pages.insert(
            title.to_string(),
            (id, links.iter().map(|l| l.to_string()).collect()),
        );
        self
    }

    /// Any batch that contains `title` fails as a whole.
    pub fn failing(mut self, title: &str) -> Self {
        self.failing.insert(title.to_string());
        self
    }

    pub fn normalize(mut self, from: &str, to: &str) -> Self {
        self.normalized.insert(from.to_string(), to.to_string());
        self
    }

    /// Links per page per response; more links trigger continuation.
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    pub fn queries(&self) -> Vec<LinkQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl LinkSource for FakeWiki {
    async fn query(&self, query: &LinkQuery) -> Result<QueryResult> {
        self.queries.lock().unwrap().push(query.clone());

        if let Some(bad) = query.titles.iter().find(|t| self.failing.contains(*t)) {
            return Err(Error::Status {
                status: 500,
                url: format!("fake://{}", bad),
            });
        }

        let offset: usize = query
            .continuation
            .as_ref()
            .and_then(|c| c.get("plcontinue"))
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        let mut result = QueryResult::default();
        let mut more = false;

        for requested in &query.titles {
            let title = match self.normalized.get(requested) {
                Some(to) => {
                    result.normalized.push((requested.clone(), to.clone()));
                    to.clone()
                }
                None => requested.clone(),
            };

            match self.pages.get(&title) {
                Some((id, links)) => {
                    let end = offset.saturating_add(self.page_size).min(links.len());
                    let start = offset.min(end);
                    more |= end < links.len();
                    result.pages.push(ApiPage {
                        id: Some(*id),
                        title,
                        links: links[start..end].to_vec(),
                        missing: false,
                    });
                }
                None => result.pages.push(ApiPage {
                    id: None,
                    title,
                    links: Vec::new(),
                    missing: true,
                }),
            }
        }

        if more {
            let next = offset + self.page_size;
            result.continuation = Some(Continuation::from([
                ("plcontinue".to_string(), next.to_string()),
                ("continue".to_string(), "||".to_string()),
            ]));
        }

        Ok(result)
    }
}

/// Replays canned responses in order.
pub struct ScriptedSource {
    responses: Mutex<VecDeque<Result<QueryResult>>>,
    queries: Mutex<Vec<LinkQuery>>,
}

impl ScriptedSource {
    pub fn new(responses: Vec<Result<QueryResult>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<LinkQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl LinkSource for ScriptedSource {
    async fn query(&self, query: &LinkQuery) -> Result<QueryResult> {
        self.queries.lock().unwrap().push(query.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Config("script exhausted".to_string())))
    }
}

pub fn api_page(id: u64, title: &str, links: &[&str]) -> ApiPage {
    ApiPage {
        id: Some(id),
        title: title.to_string(),
        links: links.iter().map(|l| l.to_string()).collect(),
        missing: false,
    }
}
