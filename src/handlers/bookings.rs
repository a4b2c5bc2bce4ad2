use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::errors::{AppError, BookingError};
use crate::models::{Booking, BookingRequest, BookingStatus};
use crate::services::calendar::generate_ics;
use crate::services::desk::Submission;
use crate::state::AppState;

// POST /api/bookings
pub async fn submit_booking(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Submission>), AppError> {
    let submission = state.desk.submit(&request).await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

// GET /api/bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Booking>>, AppError> {
    Ok(Json(state.desk.manager().list_bookings()?))
}

fn find_booking(state: &AppState, id: &str) -> Result<Booking, AppError> {
    state
        .desk
        .manager()
        .get_booking(id)?
        .ok_or_else(|| BookingError::NotFound(format!("booking {id}")).into())
}

// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(find_booking(&state, &id)?))
}

#[derive(Deserialize)]
pub struct StatusUpdate {
    status: String,
}

// POST /api/bookings/:id/status
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Booking>, AppError> {
    let status = BookingStatus::parse(&update.status)
        .ok_or_else(|| AppError::BadRequest(format!("unknown status: {}", update.status)))?;

    let booking = state
        .desk
        .manager()
        .update_status(&id, status)?
        .ok_or_else(|| BookingError::NotFound(format!("booking {id}")))?;
    Ok(Json(booking))
}

// GET /api/bookings/export
pub async fn export_bookings(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let export = state.desk.manager().export_all()?;

    if let Some(dir) = &state.config.export_dir {
        match export.write_to(dir) {
            Ok(path) => tracing::info!(path = %path.display(), "bookings exported"),
            Err(e) => tracing::warn!(error = %e, dir = %dir, "failed to write export file"),
        }
    }

    let disposition = format!("attachment; filename=\"{}\"", export.filename);
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.json,
    )
        .into_response())
}

// GET /api/bookings/:id/ics
pub async fn download_ics(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let id = raw_id.strip_suffix(".ics").unwrap_or(&raw_id);
    let booking = find_booking(&state, id)?;

    let ics = generate_ics(&booking, &state.config.business_name);
    let disposition = format!("attachment; filename=\"booking-{id}.ics\"");

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        ics,
    )
        .into_response())
}
