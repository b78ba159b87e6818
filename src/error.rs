use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;
use crate::domain::models::show_timing::InvalidShowTiming;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    InvalidReference(String),
    #[error("Theatre not found")]
    SlotNotFound,
    #[error("This movie is not assigned to this theatre for the selected timing")]
    SlotNotAssigned,
    #[error("Not enough seats available (requested {requested}, available {available})")]
    InsufficientSeats { requested: i32, available: i32 },
    #[error("Booking not found")]
    BookingNotFound,
    #[error("You are not authorized to cancel this booking")]
    NotAuthorized,
    #[error("Booking is already cancelled")]
    AlreadyCancelled,
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
}

impl AppError {
    /// Stable machine-readable discriminant sent alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Database(_) => "storage_failure",
            AppError::InvalidReference(_) => "invalid_reference",
            AppError::SlotNotFound => "slot_not_found",
            AppError::SlotNotAssigned => "slot_not_assigned",
            AppError::InsufficientSeats { .. } => "insufficient_seats",
            AppError::BookingNotFound => "booking_not_found",
            AppError::NotAuthorized => "not_authorized",
            AppError::AlreadyCancelled => "already_cancelled",
            AppError::NotFound(_) => "not_found",
            AppError::Unauthorized => "unauthenticated",
            AppError::Forbidden(_) => "forbidden",
            AppError::Conflict(_) => "conflict",
            AppError::Validation(_) => "validation",
        }
    }
}

impl From<InvalidShowTiming> for AppError {
    fn from(err: InvalidShowTiming) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    let code = db_err.code().unwrap_or_default();

                    // 2067 = SQLite Unique Constraint
                    // 23505 = PostgreSQL Unique Violation
                    if code == "2067" || code == "23505" {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({ "error": "Resource already exists (duplicate entry)", "kind": "conflict" }))
                        ).into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::InvalidReference(msg) | AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::SlotNotFound | AppError::SlotNotAssigned | AppError::BookingNotFound => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::InsufficientSeats { .. } | AppError::AlreadyCancelled => (StatusCode::CONFLICT, self.to_string()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::NotAuthorized => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
        };

        let body = Json(json!({
            "error": message,
            "kind": self.kind(),
        }));

        (status, body).into_response()
    }
}
