use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::BookingStatus;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("requested time is already booked: {0}")]
    Conflict(String),

    #[error("cannot change status from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for BookingError {
    fn from(e: rusqlite::Error) -> Self {
        BookingError::Storage(e.to_string())
    }
}

impl From<std::io::Error> for BookingError {
    fn from(e: std::io::Error) -> Self {
        BookingError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for BookingError {
    fn from(e: serde_json::Error) -> Self {
        BookingError::Storage(format!("corrupt booking data: {e}"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Booking(BookingError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            AppError::Booking(BookingError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Booking(BookingError::Conflict(_)) => StatusCode::CONFLICT,
            AppError::Booking(BookingError::InvalidTransition { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Booking(BookingError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
