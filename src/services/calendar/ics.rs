use crate::models::{Booking, BookingDetails, BookingStatus};
use crate::services::calendar::event::title;

/// Text values may not carry raw newlines, commas or semicolons.
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}

pub fn generate_ics(booking: &Booking, business_name: &str) -> String {
    let (dtstart, dtend) = match &booking.details {
        BookingDetails::Salon(s) => {
            let (start, end) = s.interval();
            (
                format!("DTSTART:{}", start.format("%Y%m%dT%H%M%S")),
                format!("DTEND:{}", end.format("%Y%m%dT%H%M%S")),
            )
        }
        BookingDetails::Hotel(h) => (
            format!("DTSTART;VALUE=DATE:{}", h.check_in_date.format("%Y%m%d")),
            format!("DTEND;VALUE=DATE:{}", h.check_out_date.format("%Y%m%d")),
        ),
    };
    let dtstamp = booking.created_at.format("%Y%m%dT%H%M%SZ").to_string();
    let uid = format!("{}@bookdesk", booking.id);
    let status = match booking.status {
        BookingStatus::Cancelled => "CANCELLED",
        BookingStatus::Confirmed => "CONFIRMED",
        BookingStatus::Pending => "TENTATIVE",
    };

    let summary = escape(&format!("{} ({business_name})", title(booking)));
    let description = escape(
        booking
            .special_requests
            .as_deref()
            .unwrap_or("No special requests"),
    );

    format!(
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:-//Bookdesk//Booking Widget//EN\r\n\
         BEGIN:VEVENT\r\n\
         UID:{uid}\r\n\
         DTSTAMP:{dtstamp}\r\n\
         {dtstart}\r\n\
         {dtend}\r\n\
         STATUS:{status}\r\n\
         SUMMARY:{summary}\r\n\
         DESCRIPTION:{description}\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n"
    )
}
