use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::BookingError;
use crate::models::catalog::{Room, SalonService};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    #[serde(flatten)]
    pub details: BookingDetails,
    pub status: BookingStatus,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BookingDetails {
    Salon(SalonDetails),
    Hotel(HotelDetails),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalonDetails {
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub service: SalonService,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HotelDetails {
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub service: Room,
    pub guests: u32,
    pub nights: u32,
    pub total_price: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    /// Re-applying the current status is allowed and changes nothing.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (*self, next),
            (Pending, _) | (Confirmed, Confirmed) | (Confirmed, Cancelled) | (Cancelled, Cancelled)
        )
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Booking {
    pub fn kind(&self) -> &'static str {
        match self.details {
            BookingDetails::Salon(_) => "salon",
            BookingDetails::Hotel(_) => "hotel",
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == BookingStatus::Cancelled
    }

    pub fn service_name(&self) -> &str {
        match &self.details {
            BookingDetails::Salon(s) => &s.service.name,
            BookingDetails::Hotel(h) => &h.service.name,
        }
    }

    /// `[start, start + duration)` for salon bookings.
    pub fn salon_interval(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        match &self.details {
            BookingDetails::Salon(s) => Some(s.interval()),
            BookingDetails::Hotel(_) => None,
        }
    }

    /// `(room id, check-in, check-out)` for hotel bookings.
    pub fn hotel_stay(&self) -> Option<(u32, NaiveDate, NaiveDate)> {
        match &self.details {
            BookingDetails::Hotel(h) => Some((h.service.id, h.check_in_date, h.check_out_date)),
            BookingDetails::Salon(_) => None,
        }
    }
}

impl SalonDetails {
    pub fn start(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    pub fn interval(&self) -> (NaiveDateTime, NaiveDateTime) {
        let start = self.start();
        (start, crate::services::availability::end_of(start, self.service.duration))
    }
}

/// Only four-digit years are accepted, so date arithmetic on the result
/// stays inside chrono's range.
pub fn parse_date(s: &str) -> Result<NaiveDate, BookingError> {
    let invalid = || BookingError::InvalidInput(format!("invalid date (expected YYYY-MM-DD): {s:?}"));
    let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| invalid())?;
    if !(1..=9999).contains(&date.year()) {
        return Err(invalid());
    }
    Ok(date)
}

pub fn parse_time(s: &str) -> Result<NaiveTime, BookingError> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| BookingError::InvalidInput(format!("invalid time (expected HH:MM): {s:?}")))
}

/// Slot times are stored as `HH:MM`.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}
