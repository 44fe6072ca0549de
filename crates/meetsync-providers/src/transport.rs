//! HTTP transport used by the paginated fetch loop.
//!
//! [`HttpTransport`] is the seam between pagination and the network: it
//! issues a single GET and hands back the status, the `Link` header and the
//! raw body without interpreting any of them. [`ReqwestTransport`] is the
//! production implementation.

use std::future::Future;
use std::pin::Pin;

use reqwest::header::LINK;
use reqwest::{Client, StatusCode};
use tracing::trace;
use url::Url;

use crate::error::{ProviderError, ProviderResult};

/// A boxed future for the object-safe transport trait.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Query parameters attached to a request.
pub type Query = Vec<(&'static str, String)>;

/// Query parameters whose values never appear in logs or errors.
const SECRET_PARAMS: &[&str] = &["key", "sig"];

/// Returns `url` with the values of credential query parameters masked.
///
/// Meetup continuation URLs echo the API key back, so anything logged must
/// go through this first. Unparseable input loses its whole query string.
pub(crate) fn redact_url(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.split('?').next().unwrap_or_default().to_string();
    };
    if parsed.query().is_none() {
        return parsed.into();
    }

    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| {
            let v = if SECRET_PARAMS.contains(&k.as_ref()) {
                "REDACTED".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    parsed.query_pairs_mut().clear().extend_pairs(pairs);
    parsed.into()
}

/// One HTTP response, fully read.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Response status.
    pub status: StatusCode,
    /// All `Link` header values, joined with `", "`.
    pub link: Option<String>,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    /// Creates a `200 OK` response with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            link: None,
            body: body.into(),
        }
    }

    /// Creates a response with the given status and body.
    pub fn with_status(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            link: None,
            body: body.into(),
        }
    }

    /// Builder method to set the `Link` header.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// Issues GET requests on behalf of the paginated fetch loop.
///
/// Implementations report transport-level failures (connect, DNS, reading
/// the body) as network fetch failures and return every response, whatever
/// its status, as an [`HttpResponse`].
pub trait HttpTransport: Send + Sync {
    /// Performs a GET against `url`, appending `query` when non-empty.
    fn get<'a>(
        &'a self,
        url: &'a str,
        query: &'a [(&'static str, String)],
    ) -> BoxFuture<'a, ProviderResult<HttpResponse>>;
}

/// [`HttpTransport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport that identifies itself with `user_agent`.
    pub fn new(user_agent: &str) -> ProviderResult<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                ProviderError::network(format!("failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;

        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get<'a>(
        &'a self,
        url: &'a str,
        query: &'a [(&'static str, String)],
    ) -> BoxFuture<'a, ProviderResult<HttpResponse>> {
        Box::pin(async move {
            let mut request = self.client.get(url);
            if !query.is_empty() {
                request = request.query(query);
            }

            trace!(url = %redact_url(url), params = query.len(), "sending request");

            // reqwest errors embed the full request URL, query included
            let response = request.send().await.map_err(|e| {
                let e = e.without_url();
                let message = if e.is_connect() {
                    format!("connection failed: {}", e)
                } else {
                    format!("request failed: {}", e)
                };
                ProviderError::network(message).with_source(e)
            })?;

            let status = response.status();
            let links: Vec<&str> = response
                .headers()
                .get_all(LINK)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .collect();
            let link = if links.is_empty() {
                None
            } else {
                Some(links.join(", "))
            };

            trace!(status = %status, has_link = link.is_some(), "received response");

            let body = response.text().await.map_err(|e| {
                let e = e.without_url();
                ProviderError::network(format!("failed to read response: {}", e)).with_source(e)
            })?;

            Ok(HttpResponse { status, link, body })
        })
    }
}
