//! Meetup API client.
//!
//! This module provides [`MeetupClient`], which fetches a group's past events
//! and each event's attendance list, following pagination transparently.
//!
//! # Example
//!
//! ```ignore
//! use meetsync_core::TimeWindow;
//! use meetsync_providers::meetup::{MeetupClient, MeetupConfig};
//!
//! let config = MeetupConfig::new("OpenTwinCities", api_key)?;
//! let client = MeetupClient::new(config)?;
//!
//! for event in client.fetch_events(&TimeWindow::default()).await? {
//!     let attendees = client.fetch_attendees(&event.id).await?;
//! }
//! ```

mod client;
mod config;

pub use client::MeetupClient;
pub use config::MeetupConfig;
