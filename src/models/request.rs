use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::BookingError;
use crate::models::booking::{parse_date, parse_time, BookingDetails, HotelDetails, SalonDetails};
use crate::models::catalog::Catalog;
use crate::services::availability::end_of;

/// What the widget submits when a customer asks for a reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    #[serde(flatten)]
    pub details: RequestDetails,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub special_requests: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RequestDetails {
    #[serde(rename_all = "camelCase")]
    Salon {
        service_id: u32,
        date: String,
        time: String,
    },
    #[serde(rename_all = "camelCase")]
    Hotel {
        room_id: u32,
        check_in_date: String,
        check_out_date: String,
        guests: u32,
    },
}

/// Contact fields after trimming.
#[derive(Debug, Clone)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub special_requests: Option<String>,
}

impl BookingRequest {
    pub fn contact(&self) -> Result<Contact, BookingError> {
        let required = |value: &str, field: &str| {
            let value = value.trim();
            if value.is_empty() {
                Err(BookingError::InvalidInput(format!("{field} is required")))
            } else {
                Ok(value.to_string())
            }
        };

        Ok(Contact {
            name: required(&self.customer_name, "customerName")?,
            email: required(&self.customer_email, "customerEmail")?,
            phone: required(&self.customer_phone, "customerPhone")?,
            special_requests: self
                .special_requests
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        })
    }

    /// Parses and checks the request against the catalog, producing the
    /// variant fields of the booking to be stored.
    pub fn resolve(&self, catalog: &Catalog, today: NaiveDate) -> Result<BookingDetails, BookingError> {
        match &self.details {
            RequestDetails::Salon {
                service_id,
                date,
                time,
            } => {
                let date = parse_date(date)?;
                let time = parse_time(time)?;
                let service = catalog.salon_service(*service_id).ok_or_else(|| {
                    BookingError::InvalidInput(format!("unknown salon service: {service_id}"))
                })?;
                check_salon_hours(catalog, date, time, service.duration)?;

                Ok(BookingDetails::Salon(SalonDetails {
                    date,
                    time,
                    service: service.clone(),
                }))
            }
            RequestDetails::Hotel {
                room_id,
                check_in_date,
                check_out_date,
                guests,
            } => {
                let check_in = parse_date(check_in_date)?;
                let check_out = parse_date(check_out_date)?;
                let room = catalog
                    .room(*room_id)
                    .ok_or_else(|| BookingError::InvalidInput(format!("unknown room: {room_id}")))?;

                if check_out <= check_in {
                    return Err(BookingError::InvalidInput(
                        "check-out must be after check-in".to_string(),
                    ));
                }
                if *guests == 0 || *guests > room.capacity {
                    return Err(BookingError::InvalidInput(format!(
                        "{} takes 1 to {} guests, got {guests}",
                        room.name, room.capacity
                    )));
                }
                if check_in < today {
                    return Err(BookingError::InvalidInput(
                        "check-in date is in the past".to_string(),
                    ));
                }
                let max_days = catalog.business_hours.hotel.max_advance_booking_days;
                if check_in > today + Duration::days(max_days) {
                    return Err(BookingError::InvalidInput(format!(
                        "check-in can be at most {max_days} days ahead"
                    )));
                }

                let too_long = || {
                    BookingError::InvalidInput(format!(
                        "stay from {check_in} to {check_out} is too long to price"
                    ))
                };
                let nights =
                    u32::try_from((check_out - check_in).num_days()).map_err(|_| too_long())?;
                let total_price = nights.checked_mul(room.price).ok_or_else(too_long)?;
                Ok(BookingDetails::Hotel(HotelDetails {
                    check_in_date: check_in,
                    check_out_date: check_out,
                    service: room.clone(),
                    guests: *guests,
                    nights,
                    total_price,
                }))
            }
        }
    }
}

fn check_salon_hours(
    catalog: &Catalog,
    date: NaiveDate,
    time: NaiveTime,
    duration_minutes: u32,
) -> Result<(), BookingError> {
    let hours = &catalog.business_hours.salon;
    if hours.closed_days.contains(&date.weekday()) {
        return Err(BookingError::InvalidInput(format!(
            "the salon is closed on {}",
            date.format("%A")
        )));
    }

    let start = date.and_time(time);
    let end = end_of(start, duration_minutes);
    let opens = date.and_hms_opt(hours.open_hour, 0, 0);
    // close_hour may be 24, which is midnight of the next day
    let closes = date.and_hms_opt(0, 0, 0).map(|d| d + Duration::hours(hours.close_hour as i64));
    match (opens, closes) {
        (Some(opens), Some(closes)) if start >= opens && end <= closes => Ok(()),
        _ => Err(BookingError::InvalidInput(format!(
            "appointments must fit between {:02}:00 and {:02}:00",
            hours.open_hour, hours.close_hour
        ))),
    }
}
