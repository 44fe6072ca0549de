//! The sync run: past events of a group, then the attendance of each.

use chrono::Utc;
use meetsync_core::TimeWindow;
use meetsync_providers::{MeetupClient, ProviderResult};
use tracing::{debug, info};

/// Totals of one sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Number of events fetched.
    pub events: usize,
    /// Number of attendees fetched across all events.
    pub attendees: usize,
}

/// Fetches every past event in `window` and the attendees of each event,
/// logging what was found.
///
/// Events are processed one at a time in the order the API returned them.
/// The first failure aborts the run.
pub async fn run(client: &MeetupClient, window: &TimeWindow) -> ProviderResult<SyncSummary> {
    let (start, end) = window.resolve(Utc::now());
    debug!(
        window = %window,
        start = ?start,
        end = ?end,
        group = %client.config().group_urlname,
        "fetching past events"
    );

    let events = client.fetch_events(window).await?;
    info!("fetched {} events", events.len());

    let mut summary = SyncSummary {
        events: events.len(),
        attendees: 0,
    };

    for event in &events {
        info!(
            event_id = %event.id,
            name = %event.name,
            time = %event.display_time(),
            "event"
        );

        let attendees = client.fetch_attendees(&event.id).await?;
        info!(event_id = %event.id, "{} attendees", attendees.len());
        for attendee in &attendees {
            info!(event_id = %event.id, "attendee: {}", attendee.name());
        }
        summary.attendees += attendees.len();
    }

    Ok(summary)
}
