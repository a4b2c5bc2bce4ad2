use super::BlobStore;
use crate::errors::BookingError;
use crate::models::Booking;

/// Namespace key the booking list is stored under.
pub const BOOKINGS_KEY: &str = "bookings";

/// The booking list, serialised as one JSON array in a `BlobStore`.
pub struct BookingRepository {
    store: Box<dyn BlobStore>,
}

impl BookingRepository {
    pub fn new(store: Box<dyn BlobStore>) -> Self {
        Self { store }
    }

    pub fn get_all_bookings(&self) -> Result<Vec<Booking>, BookingError> {
        match self.store.get(BOOKINGS_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn save_all(&self, bookings: &[Booking]) -> Result<(), BookingError> {
        let raw = serde_json::to_string(bookings)?;
        self.store.put(BOOKINGS_KEY, &raw)
    }

    pub fn save_booking(&self, booking: Booking) -> Result<(), BookingError> {
        let mut bookings = self.get_all_bookings()?;
        bookings.push(booking);
        self.save_all(&bookings)
    }
}
