pub mod booking;
pub mod catalog;
pub mod request;

pub use booking::{Booking, BookingDetails, BookingStatus, HotelDetails, SalonDetails};
pub use catalog::{Catalog, Room, SalonService, StorefrontItem};
pub use request::{BookingRequest, RequestDetails};
