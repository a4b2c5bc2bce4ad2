use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct AvailabilityResponse {
    available: bool,
}

// GET /api/availability/salon?date=&time=&serviceId= (or &duration=)
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalonQuery {
    date: String,
    time: String,
    service_id: Option<u32>,
    duration: Option<u32>,
}

pub async fn salon_availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SalonQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let manager = state.desk.manager();
    let duration = match (query.service_id, query.duration) {
        (Some(id), _) => manager
            .catalog()
            .salon_service(id)
            .map(|s| s.duration)
            .ok_or_else(|| AppError::BadRequest(format!("unknown salon service: {id}")))?,
        (None, Some(duration)) => duration,
        (None, None) => {
            return Err(AppError::BadRequest(
                "serviceId or duration is required".to_string(),
            ))
        }
    };

    let available = manager.is_time_slot_available(&query.date, &query.time, duration)?;
    Ok(Json(AvailabilityResponse { available }))
}

// GET /api/availability/salon/slots?date=&serviceId=
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsQuery {
    date: String,
    service_id: u32,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    date: String,
    slots: Vec<String>,
}

pub async fn salon_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    let slots = state
        .desk
        .manager()
        .free_slots(&query.date, query.service_id)?
        .into_iter()
        .map(|t| t.format("%H:%M").to_string())
        .collect();

    Ok(Json(SlotsResponse {
        date: query.date,
        slots,
    }))
}

// GET /api/availability/hotel?checkIn=&checkOut=&roomId=
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelQuery {
    check_in: String,
    check_out: String,
    room_id: u32,
}

pub async fn hotel_availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HotelQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let available =
        state
            .desk
            .manager()
            .is_room_available(&query.check_in, &query.check_out, query.room_id)?;
    Ok(Json(AvailabilityResponse { available }))
}
