// src/wiki/api.rs
// =============================================================================
// This module talks to the MediaWiki query API.
//
// A single request looks like:
//   GET https://en.wikipedia.org/w/api.php?action=query&format=json
//       &prop=links|info&pllimit=500&titles=Vince%20Vaughn|Jennifer%20Aniston
//
// and the interesting parts of the answer are:
//   {
//     "continue": { "plcontinue": "6312|0|Drama", "continue": "||" },
//     "query": {
//       "normalized": [ { "from": "vince vaughn", "to": "Vince Vaughn" } ],
//       "pages": {
//         "6312": { "pageid": 6312, "title": "Vince Vaughn",
//                   "links": [ { "ns": 0, "title": "Actor" } ] },
//         "-1":   { "title": "Nope", "missing": "" }
//       }
//     }
//   }
//
// When "continue" is present, the same query must be sent again with every
// key/value pair of that object appended, until no "continue" comes back.
// That loop lives in the repository; this module only does one round trip.
// =============================================================================

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::SearchConfig;
use crate::error::{Error, Result};

/// Key/value pairs from a response's `continue` object, echoed verbatim.
pub type Continuation = BTreeMap<String, String>;

/// One query: a batch of titles plus the continuation of a previous page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkQuery {
    pub titles: Vec<String>,
    pub continuation: Option<Continuation>,
}

impl LinkQuery {
    pub fn new(titles: Vec<String>) -> Self {
        Self {
            titles,
            continuation: None,
        }
    }

    /// Same titles, next result page.
    pub fn continued(&self, continuation: Continuation) -> Self {
        Self {
            titles: self.titles.clone(),
            continuation: Some(continuation),
        }
    }
}

/// A page as reported by one response. `links` may be only a fragment of
/// the page's full link list when the response carries a continuation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiPage {
    pub id: Option<u64>,
    pub title: String,
    pub links: Vec<String>,
    /// The API flagged the page as `missing` or `invalid`.
    pub missing: bool,
}

/// One decoded response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    pub pages: Vec<ApiPage>,
    /// `(requested, canonical)` title pairs.
    pub normalized: Vec<(String, String)>,
    pub continuation: Option<Continuation>,
}

/// Anything that can answer a link query.
///
/// The repository only depends on this trait, so tests can plug in an
/// in-memory graph instead of the real API.
#[async_trait]
pub trait LinkSource: Send + Sync {
    async fn query(&self, query: &LinkQuery) -> Result<QueryResult>;
}

// Wire format, only used for decoding

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(rename = "continue")]
    continuation: Option<serde_json::Map<String, Value>>,
    query: Option<RawQuery>,
    error: Option<RawApiError>,
}

#[derive(Debug, Deserialize)]
struct RawQuery {
    #[serde(default)]
    normalized: Vec<RawNormalized>,
    #[serde(default)]
    pages: HashMap<String, RawPage>,
}

#[derive(Debug, Deserialize)]
struct RawNormalized {
    from: String,
    to: String,
}

#[derive(Debug, Deserialize)]
struct RawPage {
    pageid: Option<u64>,
    title: String,
    #[serde(default)]
    links: Vec<RawLink>,
    missing: Option<Value>,
    invalid: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawLink {
    title: String,
}

#[derive(Debug, Deserialize)]
struct RawApiError {
    code: String,
    #[serde(default)]
    info: String,
}

// Decodes one response body into a QueryResult
//
// An `error` object wins over everything else in the body.
pub fn parse_response(body: &str) -> Result<QueryResult> {
    let raw: RawResponse = serde_json::from_str(body)?;

    if let Some(error) = raw.error {
        return Err(Error::Api {
            code: error.code,
            info: error.info,
        });
    }

    let continuation = raw.continuation.map(|map| {
        map.into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect::<Continuation>()
    });

    // No "query" at all happens when no titles were sent
    let Some(query) = raw.query else {
        return Ok(QueryResult {
            continuation,
            ..Default::default()
        });
    };

    let pages = query
        .pages
        .into_values()
        .map(|page| ApiPage {
            id: page.pageid,
            title: page.title,
            links: page.links.into_iter().map(|link| link.title).collect(),
            missing: page.missing.is_some() || page.invalid.is_some(),
        })
        .collect();

    let normalized = query
        .normalized
        .into_iter()
        .map(|n| (n.from, n.to))
        .collect();

    Ok(QueryResult {
        pages,
        normalized,
        continuation,
    })
}

/// The real MediaWiki API over HTTPS.
pub struct WikipediaApi {
    client: Client,
    endpoint: Url,
    link_limit: usize,
    namespace: Option<i64>,
}

impl WikipediaApi {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        // One client for every request so connections are pooled
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            endpoint: Url::parse(&config.api_url)?,
            link_limit: config.link_limit,
            namespace: config.namespace,
        })
    }

    // Builds the full request URL for a query
    //
    // Titles are joined with '|' and the whole parameter is percent-encoded
    // by the url crate, so "A|B" goes out as "A%7CB".
    pub fn request_url(&self, query: &LinkQuery) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("action", "query")
                .append_pair("format", "json")
                .append_pair("prop", "links|info")
                .append_pair("pllimit", &self.link_limit.to_string())
                .append_pair("titles", &query.titles.join("|"));

            if let Some(ns) = self.namespace {
                pairs.append_pair("plnamespace", &ns.to_string());
            }

            if let Some(continuation) = &query.continuation {
                for (key, value) in continuation {
                    pairs.append_pair(key, value);
                }
            }
        }
        url
    }
}

#[async_trait]
impl LinkSource for WikipediaApi {
    async fn query(&self, query: &LinkQuery) -> Result<QueryResult> {
        let url = self.request_url(query);
        debug!(
            titles = query.titles.len(),
            continued = query.continuation.is_some(),
            "GET {}",
            url
        );

        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(Error::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}
