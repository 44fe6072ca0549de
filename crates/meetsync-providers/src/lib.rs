//! Paginated Meetup API client.
//!
//! This crate retrieves a group's past events and per-event attendance lists:
//!
//! - [`MeetupClient`] - Event and attendance fetchers for one group
//! - [`fetch_all`] - The shared loop that follows page continuations
//! - [`HttpTransport`] - The HTTP seam, implemented on `reqwest`
//! - [`ProviderError`] - Error types for fetch operations
//!
//! # Architecture
//!
//! ```text
//!  fetch_events(window)           fetch_attendees(event_id)
//!          │                                │
//!          ▼                                ▼
//!  Continuation::BodyField        Continuation::LinkHeader
//!   (meta.next in JSON)            (Link: <..>; rel="next")
//!          │                                │
//!          └──────────────┬─────────────────┘
//!                         ▼
//!                  fetch_all() loop
//!                         │
//!                         ▼
//!                   HttpTransport
//! ```

pub mod error;
pub mod link_header;
pub mod meetup;
pub mod pagination;
pub mod transport;

// Re-export main types at crate root
pub use error::{FetchFailure, PageIndex, ProviderError, ProviderErrorCode, ProviderResult};
pub use meetup::{MeetupClient, MeetupConfig};
pub use pagination::{Continuation, Page, PageRequest, SeedRequest, fetch_all};
pub use transport::{BoxFuture, HttpResponse, HttpTransport, Query, ReqwestTransport};
