use chrono_tz::Tz;
use serde::Serialize;

use super::{
    CalendarClient, CalendarError, CalendarEvent, GoogleCalendarClient, RefreshTokenProvider,
    StaticTokenProvider, TokenProvider,
};
use crate::config::CalendarConfig;
use crate::models::{Booking, BookingDetails};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum MirrorOutcome {
    Synced {
        #[serde(rename = "eventId")]
        event_id: String,
    },
    Skipped,
    Failed {
        warning: String,
    },
}

pub struct CalendarMirror {
    tokens: Box<dyn TokenProvider>,
    client: Box<dyn CalendarClient>,
    salon_calendar_id: String,
    hotel_calendar_id: String,
    timezone: Tz,
    currency: String,
}

impl CalendarMirror {
    pub fn new(
        tokens: Box<dyn TokenProvider>,
        client: Box<dyn CalendarClient>,
        salon_calendar_id: String,
        hotel_calendar_id: String,
        timezone: Tz,
        currency: String,
    ) -> Self {
        Self {
            tokens,
            client,
            salon_calendar_id,
            hotel_calendar_id,
            timezone,
            currency,
        }
    }

    /// Builds the mirror from configuration, or `None` when calendar sync is off.
    pub fn from_config(config: &CalendarConfig, currency: &str) -> Result<Option<Self>, CalendarError> {
        if !config.enabled {
            return Ok(None);
        }

        let timezone: Tz = config
            .timezone
            .parse()
            .map_err(|_| CalendarError::Config(format!("unknown timezone {:?}", config.timezone)))?;

        let tokens: Box<dyn TokenProvider> = if !config.refresh_token.is_empty() {
            if config.client_id.is_empty() || config.client_secret.is_empty() {
                return Err(CalendarError::Config(
                    "a refresh token needs GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET".to_string(),
                ));
            }
            Box::new(RefreshTokenProvider::new(
                config.client_id.clone(),
                config.client_secret.clone(),
                config.refresh_token.clone(),
            ))
        } else if !config.access_token.is_empty() {
            Box::new(StaticTokenProvider::new(config.access_token.clone()))
        } else {
            return Err(CalendarError::Config(
                "calendar sync enabled without GOOGLE_REFRESH_TOKEN or GOOGLE_ACCESS_TOKEN".to_string(),
            ));
        };

        Ok(Some(Self::new(
            tokens,
            Box::new(GoogleCalendarClient::new(config.api_base.clone())),
            config.salon_calendar_id.clone(),
            config.hotel_calendar_id.clone(),
            timezone,
            currency.to_string(),
        )))
    }

    fn calendar_for(&self, booking: &Booking) -> &str {
        match booking.details {
            BookingDetails::Salon(_) => &self.salon_calendar_id,
            BookingDetails::Hotel(_) => &self.hotel_calendar_id,
        }
    }

    async fn try_mirror(&self, booking: &Booking) -> Result<String, CalendarError> {
        let event = CalendarEvent::from_booking(booking, self.timezone, &self.currency)?;
        let token = self.tokens.access_token().await?;
        let created = self
            .client
            .insert_event(self.calendar_for(booking), &token, &event)
            .await?;
        Ok(created.id)
    }

    /// Copies a booking onto its calendar. Never fails; problems come back as
    /// [`MirrorOutcome::Failed`].
    pub async fn mirror(&self, booking: &Booking) -> MirrorOutcome {
        match self.try_mirror(booking).await {
            Ok(event_id) => {
                tracing::info!(booking_id = %booking.id, event_id = %event_id, "booking mirrored to calendar");
                MirrorOutcome::Synced { event_id }
            }
            Err(e) => {
                tracing::warn!(booking_id = %booking.id, error = %e, "calendar mirror failed");
                MirrorOutcome::Failed {
                    warning: e.to_string(),
                }
            }
        }
    }
}
