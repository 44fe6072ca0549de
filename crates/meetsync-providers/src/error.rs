//! Error types for Meetup API operations.
//!
//! Every failure is a [`ProviderError`] carrying a [`ProviderErrorCode`].
//! Fetch failures additionally record which page of a paginated chain
//! failed and why.

use std::fmt;
use thiserror::Error;

/// The category of a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// A required identifier or credential is absent.
    ConfigurationMissing,
    /// A fetch was invoked with neither (or both) seed parameters and a
    /// continuation URL, or with an empty identifier.
    InvalidArgument,
    /// A page could not be retrieved or parsed.
    FetchFailed,
}

impl ProviderErrorCode {
    /// Returns a machine-friendly name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigurationMissing => "configuration_missing",
            Self::InvalidArgument => "invalid_argument",
            Self::FetchFailed => "fetch_failed",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a page fetch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailure {
    /// Connection, DNS or body transfer failure.
    Network,
    /// The server answered with a non-success status code.
    Status(u16),
    /// The body was not the JSON shape the endpoint promises.
    MalformedBody,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => write!(f, "network"),
            Self::Status(code) => write!(f, "status {}", code),
            Self::MalformedBody => write!(f, "malformed body"),
        }
    }
}

/// Position of a page within a paginated chain.
///
/// Page 0 is the root request; page `n` is reached after following `n`
/// continuation links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PageIndex(pub usize);

impl PageIndex {
    /// The first request of a chain.
    pub const ROOT: PageIndex = PageIndex(0);

    /// Returns true for the root request.
    pub fn is_root(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for PageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "root page")
        } else {
            write!(f, "continuation page {}", self.0)
        }
    }
}

/// An error that occurred while talking to the Meetup API.
#[derive(Debug, Error)]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    /// Which page of a paginated chain failed (fetch failures only).
    page: Option<PageIndex>,
    /// What went wrong with the page (fetch failures only).
    reason: Option<FetchFailure>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    /// Creates a new provider error with the given code and message.
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            page: None,
            reason: None,
            source: None,
        }
    }

    /// Creates a missing-configuration error.
    pub fn configuration_missing(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ConfigurationMissing, message)
    }

    /// Creates an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidArgument, message)
    }

    /// Creates a fetch failure with the given reason.
    pub fn fetch_failed(reason: FetchFailure, message: impl Into<String>) -> Self {
        let mut err = Self::new(ProviderErrorCode::FetchFailed, message);
        err.reason = Some(reason);
        err
    }

    /// Creates a network fetch failure.
    pub fn network(message: impl Into<String>) -> Self {
        Self::fetch_failed(FetchFailure::Network, message)
    }

    /// Creates a fetch failure for a non-success HTTP status.
    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::fetch_failed(FetchFailure::Status(code), message)
    }

    /// Creates a fetch failure for an unparseable body.
    pub fn malformed_body(message: impl Into<String>) -> Self {
        Self::fetch_failed(FetchFailure::MalformedBody, message)
    }

    /// Records which page of a chain this error belongs to.
    pub fn at_page(mut self, page: PageIndex) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the failing page, if this is a fetch failure within a chain.
    pub fn page(&self) -> Option<PageIndex> {
        self.page
    }

    /// Returns why the fetch failed, if this is a fetch failure.
    pub fn reason(&self) -> Option<FetchFailure> {
        self.reason
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)?;
        if let Some(page) = self.page {
            write!(f, " on {}", page)?;
        }
        if let Some(reason) = self.reason {
            write!(f, " ({})", reason)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// A specialized Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_names() {
        assert_eq!(
            ProviderErrorCode::ConfigurationMissing.as_str(),
            "configuration_missing"
        );
        assert_eq!(ProviderErrorCode::FetchFailed.to_string(), "fetch_failed");
    }

    #[test]
    fn fetch_failure_carries_reason() {
        let err = ProviderError::status(500, "Internal Server Error");
        assert_eq!(err.code(), ProviderErrorCode::FetchFailed);
        assert_eq!(err.reason(), Some(FetchFailure::Status(500)));
        assert!(err.page().is_none());
    }

    #[test]
    fn configuration_error_has_no_page() {
        let err = ProviderError::configuration_missing("api key is required");
        assert_eq!(err.code(), ProviderErrorCode::ConfigurationMissing);
        assert_eq!(err.message(), "api key is required");
        assert!(err.reason().is_none());
        assert!(err.page().is_none());
    }

    #[test]
    fn display_names_the_page() {
        let err = ProviderError::malformed_body("expected value at line 1 column 1")
            .at_page(PageIndex(2));
        assert_eq!(
            err.to_string(),
            "fetch_failed on continuation page 2 (malformed body): expected value at line 1 column 1"
        );

        let err = ProviderError::network("connection refused").at_page(PageIndex::ROOT);
        assert_eq!(
            err.to_string(),
            "fetch_failed on root page (network): connection refused"
        );
    }

    #[test]
    fn provider_error_with_source() {
        use std::error::Error;
        let io_err = std::io::Error::other("reset by peer");
        let err = ProviderError::network("failed to read body").with_source(io_err);
        assert!(err.source().is_some());
    }
}
