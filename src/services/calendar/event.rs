use chrono::{NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::CalendarError;
use crate::models::{Booking, BookingDetails};

/// Event body for the calendar insert endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub summary: String,
    pub description: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub attendees: Vec<Attendee>,
    pub reminders: Reminders,
}

/// Either `date_time` (timed) or `date` (all-day) is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attendee {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reminders {
    pub use_default: bool,
    pub overrides: Vec<ReminderOverride>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReminderOverride {
    pub method: String,
    pub minutes: u32,
}

impl Reminders {
    /// Email a day ahead, popup an hour ahead.
    pub fn standard() -> Self {
        Self {
            use_default: false,
            overrides: vec![
                ReminderOverride {
                    method: "email".to_string(),
                    minutes: 24 * 60,
                },
                ReminderOverride {
                    method: "popup".to_string(),
                    minutes: 60,
                },
            ],
        }
    }
}

impl CalendarEvent {
    pub fn from_booking(booking: &Booking, tz: Tz, currency: &str) -> Result<Self, CalendarError> {
        let (start, end) = match &booking.details {
            BookingDetails::Salon(s) => {
                let (start, end) = s.interval();
                (timed(start, tz)?, timed(end, tz)?)
            }
            BookingDetails::Hotel(h) => (
                EventDateTime {
                    date: Some(h.check_in_date.format("%Y-%m-%d").to_string()),
                    ..Default::default()
                },
                EventDateTime {
                    date: Some(h.check_out_date.format("%Y-%m-%d").to_string()),
                    ..Default::default()
                },
            ),
        };

        Ok(Self {
            summary: title(booking),
            description: description(booking, currency),
            start,
            end,
            attendees: vec![Attendee {
                email: booking.customer_email.clone(),
            }],
            reminders: Reminders::standard(),
        })
    }
}

fn timed(local: NaiveDateTime, tz: Tz) -> Result<EventDateTime, CalendarError> {
    let at = tz
        .from_local_datetime(&local)
        .earliest()
        .ok_or_else(|| {
            CalendarError::InvalidTime(format!("{local} does not exist in {}", tz.name()))
        })?;
    Ok(EventDateTime {
        date_time: Some(at.to_rfc3339()),
        date: None,
        time_zone: Some(tz.name().to_string()),
    })
}

pub fn title(booking: &Booking) -> String {
    match &booking.details {
        BookingDetails::Salon(s) => format!("{} - {}", s.service.name, booking.customer_name),
        BookingDetails::Hotel(h) => {
            format!("Hotel Booking - {} - {}", h.service.name, booking.customer_name)
        }
    }
}

pub fn description(booking: &Booking, currency: &str) -> String {
    let mut lines = vec![
        format!("Customer: {}", booking.customer_name),
        format!("Phone: {}", booking.customer_phone),
        format!("Email: {}", booking.customer_email),
        String::new(),
    ];

    match &booking.details {
        BookingDetails::Salon(s) => {
            lines.push(format!("Service: {}", s.service.name));
            lines.push(format!("Duration: {} minutes", s.service.duration));
            lines.push(format!("Price: {currency}{}", s.service.price));
        }
        BookingDetails::Hotel(h) => {
            lines.push(format!("Room: {}", h.service.name));
            lines.push(format!("Guests: {}", h.guests));
            lines.push(format!("Nights: {}", h.nights));
            lines.push(format!("Total: {currency}{}", h.total_price));
        }
    }

    if let Some(requests) = &booking.special_requests {
        lines.push(String::new());
        lines.push("Special Requests:".to_string());
        lines.push(requests.clone());
    }

    lines.join("\n")
}
