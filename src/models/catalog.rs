use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalonService {
    pub id: u32,
    pub name: String,
    /// Minutes.
    pub duration: u32,
    pub price: u32,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Room {
    pub id: u32,
    pub name: String,
    /// Per night.
    pub price: u32,
    pub capacity: u32,
    #[serde(default)]
    pub amenities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalonHours {
    pub open_hour: u32,
    pub close_hour: u32,
    #[serde(default)]
    pub closed_days: Vec<Weekday>,
    pub time_slots: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelHours {
    pub check_in_hour: u32,
    pub check_out_hour: u32,
    pub max_advance_booking_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessHours {
    pub salon: SalonHours,
    pub hotel: HotelHours,
}

/// Static catalog of bookable services, rooms and opening hours.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub salon_services: Vec<SalonService>,
    pub hotel_rooms: Vec<Room>,
    pub business_hours: BusinessHours,
    #[serde(default = "default_currency")]
    pub currency_symbol: String,
}

fn default_currency() -> String {
    "₹".to_string()
}

/// A catalog entry rendered as a product listing for the shop front.
#[derive(Debug, Clone, Serialize)]
pub struct StorefrontItem {
    pub name: String,
    pub description: String,
    pub price: u32,
    pub category: String,
    pub subcategory: String,
    pub onsale: bool,
    pub rating: f32,
    pub offer: u32,
    pub starttime: u32,
    pub endtime: u32,
    pub add_text: String,
    pub booking_type: String,
    pub service_id: u32,
}

/// Upper bound on how far ahead a hotel stay can be booked.
const MAX_ADVANCE_DAYS: i64 = 3650;

impl Default for Catalog {
    fn default() -> Self {
        let salon = |id, name: &str, duration, price, category: &str| SalonService {
            id,
            name: name.to_string(),
            duration,
            price,
            category: category.to_string(),
        };
        let room = |id, name: &str, price, capacity, amenities: &[&str]| Room {
            id,
            name: name.to_string(),
            price,
            capacity,
            amenities: amenities.iter().map(|a| a.to_string()).collect(),
        };

        Self {
            salon_services: vec![
                salon(1, "Haircut & Style", 60, 1200, "Hair"),
                salon(2, "Hair Color", 120, 2500, "Hair"),
                salon(3, "Facial Treatment", 90, 1800, "Skin"),
                salon(4, "Manicure", 45, 800, "Nails"),
                salon(5, "Pedicure", 60, 1000, "Nails"),
                salon(6, "Hair Spa", 90, 1500, "Hair"),
                salon(7, "Eyebrow Threading", 30, 300, "Skin"),
                salon(8, "Full Body Massage", 120, 3000, "Body"),
            ],
            hotel_rooms: vec![
                room(1, "Standard Room", 2500, 2, &["WiFi", "AC", "TV"]),
                room(2, "Deluxe Room", 3500, 3, &["WiFi", "AC", "TV", "Mini Bar"]),
                room(3, "Suite", 5000, 4, &["WiFi", "AC", "TV", "Mini Bar", "Balcony"]),
                room(4, "Family Room", 4000, 6, &["WiFi", "AC", "TV", "Kitchen"]),
                room(
                    5,
                    "Presidential Suite",
                    8000,
                    4,
                    &["WiFi", "AC", "TV", "Mini Bar", "Balcony", "Jacuzzi"],
                ),
            ],
            business_hours: BusinessHours {
                salon: SalonHours {
                    open_hour: 9,
                    close_hour: 19,
                    closed_days: vec![Weekday::Sun],
                    time_slots: [
                        "09:00", "09:30", "10:00", "10:30", "11:00", "11:30", "12:00", "12:30",
                        "14:00", "14:30", "15:00", "15:30", "16:00", "16:30", "17:00", "17:30",
                        "18:00", "18:30",
                    ]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                },
                hotel: HotelHours {
                    check_in_hour: 14,
                    check_out_hour: 11,
                    max_advance_booking_days: 90,
                },
            },
            currency_symbol: default_currency(),
        }
    }
}

impl Catalog {
    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        let catalog: Catalog = serde_json::from_str(s)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog: {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid catalog: {}", path.display()))
    }

    fn validate(&self) -> anyhow::Result<()> {
        let hours = &self.business_hours.salon;
        if hours.open_hour >= hours.close_hour || hours.close_hour > 24 {
            anyhow::bail!(
                "salon hours out of range: {}-{}",
                hours.open_hour,
                hours.close_hour
            );
        }
        for slot in &hours.time_slots {
            NaiveTime::parse_from_str(slot, "%H:%M")
                .map_err(|_| anyhow::anyhow!("invalid time slot: {slot}"))?;
        }
        let hotel = &self.business_hours.hotel;
        if hotel.check_in_hour > 23 || hotel.check_out_hour > 23 {
            anyhow::bail!("hotel check-in/check-out hour out of range");
        }
        if !(0..=MAX_ADVANCE_DAYS).contains(&hotel.max_advance_booking_days) {
            anyhow::bail!(
                "maxAdvanceBookingDays must be between 0 and {MAX_ADVANCE_DAYS}, got {}",
                hotel.max_advance_booking_days
            );
        }

        let mut seen = HashSet::new();
        for service in &self.salon_services {
            if service.duration == 0 {
                anyhow::bail!("salon service {} has zero duration", service.id);
            }
            if !seen.insert(service.id) {
                anyhow::bail!("duplicate salon service id: {}", service.id);
            }
        }
        seen.clear();
        for room in &self.hotel_rooms {
            if !seen.insert(room.id) {
                anyhow::bail!("duplicate room id: {}", room.id);
            }
        }
        Ok(())
    }

    pub fn salon_service(&self, id: u32) -> Option<&SalonService> {
        self.salon_services.iter().find(|s| s.id == id)
    }

    pub fn room(&self, id: u32) -> Option<&Room> {
        self.hotel_rooms.iter().find(|r| r.id == id)
    }

    /// Configured salon slots as times, skipping anything unparseable.
    pub fn salon_slots(&self) -> Vec<NaiveTime> {
        self.business_hours
            .salon
            .time_slots
            .iter()
            .filter_map(|s| NaiveTime::parse_from_str(s, "%H:%M").ok())
            .collect()
    }

    pub fn storefront_items(&self) -> Vec<StorefrontItem> {
        let hours = &self.business_hours.salon;
        let salon = self.salon_services.iter().map(|s| StorefrontItem {
            name: s.name.clone(),
            description: format!("Professional {} service", s.category.to_lowercase()),
            price: s.price,
            category: "Booking Services".to_string(),
            subcategory: "Salon".to_string(),
            onsale: true,
            rating: 4.8,
            offer: 10,
            starttime: hours.open_hour,
            endtime: hours.close_hour,
            add_text: format!("Duration: {} minutes", s.duration),
            booking_type: "salon".to_string(),
            service_id: s.id,
        });
        let hotel = self.hotel_rooms.iter().map(|r| StorefrontItem {
            name: r.name.clone(),
            description: format!("Comfortable accommodation for {} guests", r.capacity),
            price: r.price,
            category: "Booking Services".to_string(),
            subcategory: "Hotel".to_string(),
            onsale: true,
            rating: 4.7,
            offer: 15,
            starttime: 0,
            endtime: 24,
            add_text: format!(
                "Capacity: {} guests, Amenities: {}",
                r.capacity,
                r.amenities.join(", ")
            ),
            booking_type: "hotel".to_string(),
            service_id: r.id,
        });
        salon.chain(hotel).collect()
    }
}
