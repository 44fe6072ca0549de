//! Meetup client configuration.

use crate::error::{ProviderError, ProviderResult};

/// Configuration for [`MeetupClient`](super::MeetupClient).
///
/// Built once from the resolved application settings and handed to the
/// client at construction; the client never reads the environment itself.
#[derive(Clone)]
pub struct MeetupConfig {
    /// Group identifier used in Meetup URLs, e.g. `OpenTwinCities`.
    pub group_urlname: String,

    /// Key sent as the `key` query parameter on every seed request.
    pub api_key: String,

    /// Base URL of the v2 API (events).
    pub v2_base: String,

    /// Base URL of the v3 API (attendance).
    pub v3_base: String,

    /// Page-size hint for the events endpoint.
    pub events_page_size: u32,

    /// Page-size hint for the attendance endpoint.
    pub attendance_page_size: u32,

    /// User agent string.
    pub user_agent: String,
}

impl MeetupConfig {
    /// Default API host for both versions.
    pub const DEFAULT_BASE: &'static str = "https://api.meetup.com";

    /// Default page size for events.
    pub const DEFAULT_EVENTS_PAGE_SIZE: u32 = 20;

    /// Default page size for attendance lists.
    pub const DEFAULT_ATTENDANCE_PAGE_SIZE: u32 = 50;

    /// Creates a configuration for the given group and API key.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationMissing` error if either value is blank.
    pub fn new(group_urlname: impl Into<String>, api_key: impl Into<String>) -> ProviderResult<Self> {
        let group_urlname = group_urlname.into().trim().to_string();
        let api_key = api_key.into().trim().to_string();

        if group_urlname.is_empty() {
            return Err(ProviderError::configuration_missing(
                "group urlname must be set",
            ));
        }
        if api_key.is_empty() {
            return Err(ProviderError::configuration_missing("api key must be set"));
        }

        Ok(Self {
            group_urlname,
            api_key,
            v2_base: Self::DEFAULT_BASE.to_string(),
            v3_base: Self::DEFAULT_BASE.to_string(),
            events_page_size: Self::DEFAULT_EVENTS_PAGE_SIZE,
            attendance_page_size: Self::DEFAULT_ATTENDANCE_PAGE_SIZE,
            user_agent: format!("meetsync/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Sets the v2 API base URL.
    pub fn with_v2_base(mut self, base: impl Into<String>) -> Self {
        self.v2_base = base.into();
        self
    }

    /// Sets the v3 API base URL.
    pub fn with_v3_base(mut self, base: impl Into<String>) -> Self {
        self.v3_base = base.into();
        self
    }

    /// Returns the events endpoint URL.
    pub fn events_url(&self) -> String {
        format!("{}/2/events", self.v2_base.trim_end_matches('/'))
    }

    /// Returns the attendance endpoint URL for an event.
    pub fn attendance_url(&self, event_id: &str) -> String {
        format!(
            "{}/{}/events/{}/attendance",
            self.v3_base.trim_end_matches('/'),
            urlencoding::encode(&self.group_urlname),
            urlencoding::encode(event_id)
        )
    }
}

impl std::fmt::Debug for MeetupConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeetupConfig")
            .field("group_urlname", &self.group_urlname)
            .field("api_key", &"<redacted>")
            .field("v2_base", &self.v2_base)
            .field("v3_base", &self.v3_base)
            .field("events_page_size", &self.events_page_size)
            .field("attendance_page_size", &self.attendance_page_size)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
