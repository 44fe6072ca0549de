//! Meetup API client.
//!
//! Past events come from the v2 events endpoint, whose body carries the
//! next-page URL in `meta.next`. Attendance lists come from the v3
//! attendance endpoint, which announces the next page in a `Link` header.
//! Both run through the shared [`fetch_all`] loop.

use meetsync_core::{Attendee, MeetupEvent, TimeWindow};
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::pagination::{Continuation, PageRequest, SeedRequest, fetch_all};
use crate::transport::{HttpTransport, ReqwestTransport};

use super::config::MeetupConfig;

/// Client for a single group's events and attendance.
pub struct MeetupClient {
    config: MeetupConfig,
    transport: Box<dyn HttpTransport>,
}

impl MeetupClient {
    /// Creates a client that talks to the API over HTTP.
    pub fn new(config: MeetupConfig) -> ProviderResult<Self> {
        let transport = ReqwestTransport::new(&config.user_agent)?;
        Ok(Self::with_transport(config, transport))
    }

    /// Creates a client on top of a custom transport.
    pub fn with_transport(config: MeetupConfig, transport: impl HttpTransport + 'static) -> Self {
        Self {
            config,
            transport: Box::new(transport),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MeetupConfig {
        &self.config
    }

    /// Fetches every past event of the group within `window`.
    pub async fn fetch_events(&self, window: &TimeWindow) -> ProviderResult<Vec<MeetupEvent>> {
        self.events(PageRequest::Seed(self.events_seed(window))).await
    }

    /// Fetches events starting from a continuation URL.
    pub async fn fetch_events_from(&self, url: &str) -> ProviderResult<Vec<MeetupEvent>> {
        let request = PageRequest::from_parts(None, Some(url.to_string()))?;
        self.events(request).await
    }

    /// Fetches everyone who attended the given event.
    pub async fn fetch_attendees(&self, event_id: &str) -> ProviderResult<Vec<Attendee>> {
        if event_id.trim().is_empty() {
            return Err(ProviderError::invalid_argument("event id must not be empty"));
        }
        self.attendees(PageRequest::Seed(self.attendance_seed(event_id)))
            .await
    }

    /// Fetches attendees starting from a continuation URL.
    pub async fn fetch_attendees_from(&self, url: &str) -> ProviderResult<Vec<Attendee>> {
        let request = PageRequest::from_parts(None, Some(url.to_string()))?;
        self.attendees(request).await
    }

    async fn events(&self, request: PageRequest) -> ProviderResult<Vec<MeetupEvent>> {
        let events: Vec<MeetupEvent> =
            fetch_all(self.transport.as_ref(), request, Continuation::BodyField).await?;
        debug!(
            "fetched {} events for group {}",
            events.len(),
            self.config.group_urlname
        );
        Ok(events)
    }

    async fn attendees(&self, request: PageRequest) -> ProviderResult<Vec<Attendee>> {
        let attendees: Vec<Attendee> =
            fetch_all(self.transport.as_ref(), request, Continuation::LinkHeader).await?;
        debug!("fetched {} attendees", attendees.len());
        Ok(attendees)
    }

    fn events_seed(&self, window: &TimeWindow) -> SeedRequest {
        SeedRequest::new(self.config.events_url())
            .with_param("group_urlname", self.config.group_urlname.as_str())
            .with_param("time", window.as_str())
            .with_param("status", "past")
            .with_param("page", self.config.events_page_size.to_string())
            .with_param("key", self.config.api_key.as_str())
    }

    fn attendance_seed(&self, event_id: &str) -> SeedRequest {
        SeedRequest::new(self.config.attendance_url(event_id))
            .with_param("sign", "true")
            .with_param("filter", "attended")
            .with_param("page", self.config.attendance_page_size.to_string())
            .with_param("key", self.config.api_key.as_str())
    }
}
