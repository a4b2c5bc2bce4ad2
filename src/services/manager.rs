use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{NaiveTime, Utc};
use uuid::Uuid;

use crate::db::BookingRepository;
use crate::errors::BookingError;
use crate::models::booking::parse_date;
use crate::models::{Booking, BookingDetails, BookingRequest, BookingStatus, Catalog};
use crate::services::availability;

/// A snapshot of every booking, ready to be saved as a file.
#[derive(Debug, Clone)]
pub struct Export {
    pub filename: String,
    pub json: String,
}

impl Export {
    pub fn write_to(&self, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.json)?;
        Ok(path)
    }
}

/// Owns the booking list. Every read-modify-write of the stored list runs
/// under `write_lock`, so an availability check and the insert that follows
/// it cannot interleave with another writer in this process.
pub struct BookingManager {
    repo: BookingRepository,
    catalog: Catalog,
    enforce_availability: bool,
    write_lock: Mutex<()>,
}

impl BookingManager {
    pub fn new(repo: BookingRepository, catalog: Catalog) -> Self {
        Self {
            repo,
            catalog,
            enforce_availability: true,
            write_lock: Mutex::new(()),
        }
    }

    /// With enforcement off, conflicts are logged and the booking is saved
    /// anyway.
    pub fn with_enforcement(mut self, enforce: bool) -> Self {
        self.enforce_availability = enforce;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn create_booking(&self, request: &BookingRequest) -> Result<String, BookingError> {
        let contact = request.contact()?;
        let details = request.resolve(&self.catalog, Utc::now().date_naive())?;

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let bookings = self.repo.get_all_bookings()?;

        let conflicts = match &details {
            BookingDetails::Salon(s) => {
                availability::salon_conflicts(&bookings, s.date, s.time, s.service.duration)
            }
            BookingDetails::Hotel(h) => availability::room_conflicts(
                &bookings,
                h.check_in_date,
                h.check_out_date,
                h.service.id,
            ),
        };
        if !conflicts.is_empty() {
            if self.enforce_availability {
                tracing::info!(conflicts = ?conflicts, "rejected conflicting booking request");
                return Err(BookingError::Conflict(format!(
                    "{} overlaps {}",
                    describe_request(&details),
                    conflicts.join(", ")
                )));
            }
            tracing::warn!(conflicts = ?conflicts, "saving booking that overlaps existing bookings");
        }

        let id = generate_booking_id(&bookings);
        let booking = Booking {
            id: id.clone(),
            details,
            status: BookingStatus::Pending,
            customer_name: contact.name,
            customer_email: contact.email,
            customer_phone: contact.phone,
            special_requests: contact.special_requests,
            created_at: Utc::now(),
            updated_at: None,
        };
        let kind = booking.kind();
        self.repo.save_booking(booking)?;

        tracing::info!(booking_id = %id, kind, "booking created");
        Ok(id)
    }

    pub fn get_booking(&self, id: &str) -> Result<Option<Booking>, BookingError> {
        Ok(self.repo.get_all_bookings()?.into_iter().find(|b| b.id == id))
    }

    pub fn list_bookings(&self) -> Result<Vec<Booking>, BookingError> {
        self.repo.get_all_bookings()
    }

    /// Returns the updated booking, or `None` when no booking has that id.
    pub fn update_status(
        &self,
        id: &str,
        status: BookingStatus,
    ) -> Result<Option<Booking>, BookingError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut bookings = self.repo.get_all_bookings()?;

        let Some(booking) = bookings.iter_mut().find(|b| b.id == id) else {
            tracing::debug!(booking_id = %id, "status update for unknown booking");
            return Ok(None);
        };

        if !booking.status.can_transition_to(status) {
            return Err(BookingError::InvalidTransition {
                from: booking.status,
                to: status,
            });
        }
        if booking.status == status {
            return Ok(Some(booking.clone()));
        }

        let previous = booking.status;
        booking.status = status;
        booking.updated_at = Some(Utc::now());
        let updated = booking.clone();
        self.repo.save_all(&bookings)?;

        tracing::info!(booking_id = %id, from = %previous, to = %status, "booking status changed");
        Ok(Some(updated))
    }

    pub fn export_all(&self) -> Result<Export, BookingError> {
        let bookings = self.repo.get_all_bookings()?;
        Ok(Export {
            filename: format!("bookings_{}.json", Utc::now().format("%Y-%m-%d")),
            json: serde_json::to_string_pretty(&bookings)?,
        })
    }

    pub fn is_time_slot_available(
        &self,
        date: &str,
        time: &str,
        duration_minutes: u32,
    ) -> Result<bool, BookingError> {
        availability::check_salon_slot(&self.repo.get_all_bookings()?, date, time, duration_minutes)
    }

    pub fn is_room_available(
        &self,
        check_in: &str,
        check_out: &str,
        room_id: u32,
    ) -> Result<bool, BookingError> {
        availability::check_hotel_stay(&self.repo.get_all_bookings()?, check_in, check_out, room_id)
    }

    pub fn free_slots(&self, date: &str, service_id: u32) -> Result<Vec<NaiveTime>, BookingError> {
        let date = parse_date(date)?;
        let service = self.catalog.salon_service(service_id).ok_or_else(|| {
            BookingError::InvalidInput(format!("unknown salon service: {service_id}"))
        })?;
        Ok(availability::free_slots(
            &self.repo.get_all_bookings()?,
            &self.catalog,
            date,
            service.duration,
        ))
    }
}

fn generate_booking_id(existing: &[Booking]) -> String {
    loop {
        let id = format!("BK{}", Uuid::new_v4().simple()).to_uppercase();
        if !existing.iter().any(|b| b.id == id) {
            return id;
        }
    }
}

fn describe_request(details: &BookingDetails) -> String {
    match details {
        BookingDetails::Salon(s) => format!(
            "{} at {} on {}",
            s.service.name,
            s.time.format("%H:%M"),
            s.date
        ),
        BookingDetails::Hotel(h) => format!(
            "{} from {} to {}",
            h.service.name, h.check_in_date, h.check_out_date
        ),
    }
}
