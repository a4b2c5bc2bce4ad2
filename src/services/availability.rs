//! Conflict detection between a requested salon slot or hotel stay and the
//! bookings already on record.
//!
//! All intervals are half-open: a booking that ends at 10:00 does not block
//! one that starts at 10:00. Cancelled bookings never block anything.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::errors::BookingError;
use crate::models::booking::{parse_date, parse_time};
use crate::models::{Booking, Catalog};

/// End of an interval of `minutes` starting at `start`, saturating at the
/// last representable instant.
pub fn end_of(start: NaiveDateTime, minutes: u32) -> NaiveDateTime {
    start
        .checked_add_signed(Duration::minutes(i64::from(minutes)))
        .unwrap_or(NaiveDateTime::MAX)
}

/// `[a_start, a_end)` and `[b_start, b_end)` share at least one instant.
pub fn overlaps<T: PartialOrd>(a_start: T, a_end: T, b_start: T, b_end: T) -> bool {
    a_start < b_end && a_end > b_start
}

/// Ids of the active salon bookings that overlap `[start, start + duration)`.
pub fn salon_conflicts(
    bookings: &[Booking],
    date: NaiveDate,
    start: NaiveTime,
    duration_minutes: u32,
) -> Vec<String> {
    let requested_start = date.and_time(start);
    let requested_end = end_of(requested_start, duration_minutes);

    bookings
        .iter()
        .filter(|b| !b.is_cancelled())
        .filter_map(|b| b.salon_interval().map(|interval| (b, interval)))
        .filter(|(_, (start, end))| overlaps(requested_start, requested_end, *start, *end))
        .map(|(b, _)| b.id.clone())
        .collect()
}

/// Ids of the active bookings of `room_id` whose stay overlaps
/// `[check_in, check_out)`.
pub fn room_conflicts(
    bookings: &[Booking],
    check_in: NaiveDate,
    check_out: NaiveDate,
    room_id: u32,
) -> Vec<String> {
    bookings
        .iter()
        .filter(|b| !b.is_cancelled())
        .filter_map(|b| b.hotel_stay().map(|stay| (b, stay)))
        .filter(|(_, (room, existing_in, existing_out))| {
            *room == room_id && overlaps(check_in, check_out, *existing_in, *existing_out)
        })
        .map(|(b, _)| b.id.clone())
        .collect()
}

pub fn is_slot_available(
    bookings: &[Booking],
    date: NaiveDate,
    start: NaiveTime,
    duration_minutes: u32,
) -> bool {
    salon_conflicts(bookings, date, start, duration_minutes).is_empty()
}

pub fn is_room_available(
    bookings: &[Booking],
    check_in: NaiveDate,
    check_out: NaiveDate,
    room_id: u32,
) -> bool {
    room_conflicts(bookings, check_in, check_out, room_id).is_empty()
}

/// Salon check from raw widget input. Unparseable dates or times are an
/// error, never a guess.
pub fn check_salon_slot(
    bookings: &[Booking],
    date: &str,
    time: &str,
    duration_minutes: u32,
) -> Result<bool, BookingError> {
    let date = parse_date(date)?;
    let time = parse_time(time)?;
    if duration_minutes == 0 {
        return Err(BookingError::InvalidInput(
            "duration must be at least one minute".to_string(),
        ));
    }
    Ok(is_slot_available(bookings, date, time, duration_minutes))
}

/// Hotel check from raw widget input.
pub fn check_hotel_stay(
    bookings: &[Booking],
    check_in: &str,
    check_out: &str,
    room_id: u32,
) -> Result<bool, BookingError> {
    let check_in = parse_date(check_in)?;
    let check_out = parse_date(check_out)?;
    if check_out <= check_in {
        return Err(BookingError::InvalidInput(
            "check-out must be after check-in".to_string(),
        ));
    }
    Ok(is_room_available(bookings, check_in, check_out, room_id))
}

/// The catalog's slots on `date` that can still take an appointment of
/// `duration_minutes` and finish by closing time.
pub fn free_slots(
    bookings: &[Booking],
    catalog: &Catalog,
    date: NaiveDate,
    duration_minutes: u32,
) -> Vec<NaiveTime> {
    use chrono::Datelike;

    let hours = &catalog.business_hours.salon;
    if hours.closed_days.contains(&date.weekday()) || duration_minutes == 0 {
        return Vec::new();
    }
    let closes: Option<NaiveDateTime> = date
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight + Duration::hours(hours.close_hour as i64));

    catalog
        .salon_slots()
        .into_iter()
        .filter(|slot| {
            let end = end_of(date.and_time(*slot), duration_minutes);
            closes.map(|c| end <= c).unwrap_or(false)
        })
        .filter(|slot| is_slot_available(bookings, date, *slot, duration_minutes))
        .collect()
}
