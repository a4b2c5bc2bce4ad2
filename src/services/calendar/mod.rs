//! Mirroring bookings onto an external calendar.
//!
//! Nothing here can fail a booking: the local record is written first and
//! calendar problems come back as a [`MirrorOutcome::Failed`] warning.

pub mod client;
pub mod event;
pub mod ics;
pub mod mirror;
pub mod token;

pub use client::{CalendarClient, CreatedEvent, GoogleCalendarClient};
pub use event::CalendarEvent;
pub use ics::generate_ics;
pub use mirror::{CalendarMirror, MirrorOutcome};
pub use token::{RefreshTokenProvider, StaticTokenProvider, TokenProvider};

#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("calendar authorization failed: {0}")]
    Auth(String),

    #[error("calendar request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("calendar rejected the event ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("calendar configuration error: {0}")]
    Config(String),

    #[error("cannot place booking on the calendar: {0}")]
    InvalidTime(String),
}
