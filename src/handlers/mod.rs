pub mod availability;
pub mod bookings;
pub mod catalog;
pub mod health;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/catalog", get(catalog::get_catalog))
        .route("/api/storefront", get(catalog::get_storefront))
        .route(
            "/api/availability/salon",
            get(availability::salon_availability),
        )
        .route("/api/availability/salon/slots", get(availability::salon_slots))
        .route(
            "/api/availability/hotel",
            get(availability::hotel_availability),
        )
        .route(
            "/api/bookings",
            get(bookings::list_bookings).post(bookings::submit_booking),
        )
        .route("/api/bookings/export", get(bookings::export_bookings))
        .route("/api/bookings/:id", get(bookings::get_booking))
        .route("/api/bookings/:id/status", post(bookings::update_status))
        .route("/api/bookings/:id/ics", get(bookings::download_ics))
        .with_state(state)
}
