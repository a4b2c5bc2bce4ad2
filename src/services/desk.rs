use serde::Serialize;

use crate::errors::BookingError;
use crate::models::{Booking, BookingRequest};
use crate::services::calendar::{CalendarMirror, MirrorOutcome};
use crate::services::manager::BookingManager;

#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub booking: Booking,
    pub calendar: MirrorOutcome,
}

/// Front desk: saves a booking, then mirrors it to the calendar if one is
/// configured.
pub struct BookingDesk {
    manager: BookingManager,
    mirror: Option<CalendarMirror>,
}

impl BookingDesk {
    pub fn new(manager: BookingManager, mirror: Option<CalendarMirror>) -> Self {
        Self { manager, mirror }
    }

    pub fn manager(&self) -> &BookingManager {
        &self.manager
    }

    pub async fn submit(&self, request: &BookingRequest) -> Result<Submission, BookingError> {
        let id = self.manager.create_booking(request)?;
        let booking = self
            .manager
            .get_booking(&id)?
            .ok_or_else(|| BookingError::Storage(format!("booking {id} missing after save")))?;

        let calendar = match &self.mirror {
            Some(mirror) => mirror.mirror(&booking).await,
            None => MirrorOutcome::Skipped,
        };

        Ok(Submission { booking, calendar })
    }
}
