//! Core types: meetup records, time windows, tracing setup

pub mod event;
pub mod time;
pub mod tracing;

pub use event::{Attendee, Member, MeetupEvent};
pub use time::{TimeWindow, TimeWindowError, format_millis, format_millis_local};
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
