//! Paginated fetch shared by every Meetup endpoint.
//!
//! [`fetch_all`] requests the first page, keeps following the continuation
//! reference until there is none and returns the concatenation of every
//! page's records in arrival order. How the continuation is found depends on
//! the API version, selected with [`Continuation`]:
//!
//! - [`Continuation::BodyField`]: v2 endpoints wrap records as
//!   `{"results": [...], "meta": {"next": "<url>"}}`.
//! - [`Continuation::LinkHeader`]: v3 endpoints return a bare JSON array and
//!   put the next page in a `Link: <url>; rel="next"` header.
//!
//! A failure on any page fails the whole chain; records from pages already
//! fetched are dropped.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{PageIndex, ProviderError, ProviderResult};
use crate::link_header::find_rel;
use crate::transport::{HttpResponse, HttpTransport, Query, redact_url};

/// Where a page announces its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// `meta.next` inside the JSON envelope; empty or missing means last page.
    BodyField,
    /// The `next` relation of the `Link` response header.
    LinkHeader,
}

/// Initial request of a chain: endpoint plus query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRequest {
    pub url: String,
    pub query: Query,
}

impl SeedRequest {
    /// Creates a seed request for `url` with no parameters.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
        }
    }

    /// Builder method to append a query parameter.
    pub fn with_param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }
}

/// What to fetch next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// Build the request from seed parameters.
    Seed(SeedRequest),
    /// Fetch a continuation URL as-is, with no extra parameters.
    Next(String),
}

impl PageRequest {
    /// Builds a request from optional seed parameters and an optional
    /// continuation URL.
    ///
    /// Exactly one must be given; anything else is an `InvalidArgument`.
    pub fn from_parts(seed: Option<SeedRequest>, next: Option<String>) -> ProviderResult<Self> {
        match (seed, next) {
            (Some(seed), None) => Ok(Self::Seed(seed)),
            (None, Some(url)) if !url.is_empty() => Ok(Self::Next(url)),
            (None, _) => Err(ProviderError::invalid_argument(
                "either seed parameters or a continuation url must be provided",
            )),
            (Some(_), Some(_)) => Err(ProviderError::invalid_argument(
                "seed parameters and a continuation url are mutually exclusive",
            )),
        }
    }

    fn url(&self) -> &str {
        match self {
            Self::Seed(seed) => &seed.url,
            Self::Next(url) => url,
        }
    }

    fn query(&self) -> &[(&'static str, String)] {
        match self {
            Self::Seed(seed) => &seed.query,
            Self::Next(_) => &[],
        }
    }
}

/// One decoded page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Records in the order the API returned them.
    pub records: Vec<T>,
    /// URL of the following page, if any.
    pub next: Option<String>,
}

/// The v2 body envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    results: Vec<T>,
    #[serde(default)]
    meta: EnvelopeMeta,
}

#[derive(Debug, Default, Deserialize)]
struct EnvelopeMeta {
    #[serde(default)]
    next: Option<String>,
}

impl Continuation {
    /// Decodes a response into a page.
    ///
    /// `url` is the URL the response was fetched from, used to resolve
    /// relative `Link` targets.
    pub fn decode<T: DeserializeOwned>(
        &self,
        response: &HttpResponse,
        url: &str,
    ) -> ProviderResult<Page<T>> {
        if !response.status.is_success() {
            return Err(ProviderError::status(
                response.status.as_u16(),
                format!("API error ({}): {}", response.status, excerpt(&response.body)),
            ));
        }

        match self {
            Self::BodyField => {
                let envelope: Envelope<T> = parse_body(&response.body)?;
                let next = envelope.meta.next.filter(|next| !next.is_empty());
                Ok(Page {
                    records: envelope.results,
                    next,
                })
            }
            Self::LinkHeader => {
                let records: Vec<T> = parse_body(&response.body)?;
                let next = response
                    .link
                    .as_deref()
                    .and_then(|link| find_rel(link, "next", url));
                Ok(Page { records, next })
            }
        }
    }
}

/// Longest slice of a response body quoted in an error message.
const BODY_EXCERPT_CHARS: usize = 200;

fn excerpt(body: &str) -> String {
    match body.char_indices().nth(BODY_EXCERPT_CHARS) {
        Some((end, _)) => format!("{}...", &body[..end]),
        None => body.to_string(),
    }
}

fn parse_body<B: DeserializeOwned>(body: &str) -> ProviderResult<B> {
    serde_json::from_str(body).map_err(|e| {
        ProviderError::malformed_body(format!("failed to parse response: {}", e)).with_source(e)
    })
}

/// Fetches every page starting at `request` and merges their records.
///
/// Pages are fetched one at a time; each continuation is followed exactly
/// once. On failure the error names the failing page and no records are
/// returned.
pub async fn fetch_all<T: DeserializeOwned>(
    transport: &dyn HttpTransport,
    request: PageRequest,
    continuation: Continuation,
) -> ProviderResult<Vec<T>> {
    let mut records = Vec::new();
    let mut index = PageIndex::ROOT;
    let mut next = Some(request);

    while let Some(request) = next.take() {
        let url = request.url();
        let response = transport
            .get(url, request.query())
            .await
            .map_err(|e| e.at_page(index))?;

        let page: Page<T> = continuation
            .decode(&response, url)
            .map_err(|e| e.at_page(index))?;

        debug!(
            page = index.0,
            url = %redact_url(url),
            records = page.records.len(),
            has_next = page.next.is_some(),
            "fetched page"
        );

        records.extend(page.records);
        next = page.next.map(PageRequest::Next);
        index = PageIndex(index.0 + 1);
    }

    Ok(records)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted transport for exercising pagination without a network.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::transport::BoxFuture;

    /// A request observed by [`ScriptedTransport`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Recorded {
        pub url: String,
        pub query: Vec<(String, String)>,
    }

    impl Recorded {
        pub fn param(&self, key: &str) -> Option<&str> {
            self.query
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        }
    }

    /// Serves canned responses in order and records every request.
    #[derive(Default)]
    pub struct ScriptedTransport {
        responses: Mutex<VecDeque<ProviderResult<HttpResponse>>>,
        requests: Mutex<Vec<Recorded>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, response: HttpResponse) -> Self {
            self.responses.lock().unwrap().push_back(Ok(response));
            self
        }

        pub fn fail(self, error: ProviderError) -> Self {
            self.responses.lock().unwrap().push_back(Err(error));
            self
        }

        pub fn requests(&self) -> Vec<Recorded> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl HttpTransport for ScriptedTransport {
        fn get<'a>(
            &'a self,
            url: &'a str,
            query: &'a [(&'static str, String)],
        ) -> BoxFuture<'a, ProviderResult<HttpResponse>> {
            self.requests.lock().unwrap().push(Recorded {
                url: url.to_string(),
                query: query
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            });
            let response = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::network("no scripted response left")));
            Box::pin(async move { response })
        }
    }
}
