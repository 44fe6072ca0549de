//! Record types returned by the Meetup API.
//!
//! Only the fields the sync run reads are typed:
//! - [`MeetupEvent`]: `id`, `name` and `time` of a past event
//! - [`Attendee`]: the attending [`Member`] and its display name
//!
//! Everything else the API sends is kept in an `extra` map and serialised
//! back out unchanged, so records pass through without loss.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::time::format_millis_local;

/// A past event of a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetupEvent {
    /// Meetup's identifier for the event.
    pub id: String,
    /// Display name of the event.
    pub name: String,
    /// Scheduled start, in milliseconds since the Unix epoch.
    pub time: i64,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MeetupEvent {
    /// Returns the start formatted in the local timezone, `%Y-%m-%d %H:%M:%S`.
    pub fn display_time(&self) -> String {
        format_millis_local(self.time).unwrap_or_else(|| format!("{}ms", self.time))
    }
}

/// A member reference inside an attendance record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Display name of the member.
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of an event's attendance list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    /// The member who attended.
    pub member: Member,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Attendee {
    /// Returns the member's display name.
    pub fn name(&self) -> &str {
        &self.member.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_keeps_unknown_fields() {
        let raw = json!({
            "id": "111",
            "name": "Meetup A",
            "time": 1609459200000_i64,
            "yes_rsvp_count": 12,
            "venue": { "name": "Coffee Shop" }
        });

        let event: MeetupEvent = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(event.id, "111");
        assert_eq!(event.name, "Meetup A");
        assert_eq!(event.time, 1609459200000);
        assert_eq!(event.extra.len(), 2);
        assert_eq!(event.extra["yes_rsvp_count"], json!(12));

        assert_eq!(serde_json::to_value(&event).unwrap(), raw);
    }

    #[test]
    fn event_requires_id() {
        let raw = json!({ "name": "No id", "time": 0 });
        assert!(serde_json::from_value::<MeetupEvent>(raw).is_err());
    }

    #[test]
    fn display_time_falls_back_to_millis() {
        let raw = json!({ "id": "111", "name": "Meetup A", "time": i64::MAX });
        let event: MeetupEvent = serde_json::from_value(raw).unwrap();
        assert_eq!(event.display_time(), format!("{}ms", i64::MAX));
    }

    #[test]
    fn attendee_keeps_member_fields() {
        let raw = json!({
            "member": { "id": 42, "name": "Alice", "photo": { "id": 7 } },
            "rsvp": { "response": "yes" },
            "status": "attended"
        });

        let attendee: Attendee = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(attendee.name(), "Alice");
        assert_eq!(attendee.member.extra["id"], json!(42));
        assert_eq!(attendee.extra["status"], json!("attended"));
        assert_eq!(serde_json::to_value(&attendee).unwrap(), raw);
    }

    #[test]
    fn attendee_without_member_is_rejected() {
        let raw = json!({ "status": "attended" });
        assert!(serde_json::from_value::<Attendee>(raw).is_err());
    }
}
