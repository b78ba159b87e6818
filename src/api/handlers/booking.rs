use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::CustomerUser;
use crate::api::dtos::{requests::CreateBookingRequest, responses::BookingResponse};
use crate::domain::services::ledger::CreateBookingCommand;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    CustomerUser(user): CustomerUser,
    Path((movie_id, theatre_id)): Path<(String, String)>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("create_booking: movie {} at theatre {} ({})", movie_id, theatre_id, payload.show_timing);

    let booking = state.ledger.create_booking(CreateBookingCommand {
        user_id: user.id,
        movie_id,
        theatre_id,
        show_timing: payload.show_timing,
        number_of_tickets: payload.number_of_tickets,
    }).await?;

    Ok((StatusCode::CREATED, Json(BookingResponse {
        message: "Booking successful",
        booking,
    })))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    CustomerUser(user): CustomerUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.ledger.cancel_booking(&booking_id, &user.id).await?;

    Ok(Json(BookingResponse {
        message: "Booking cancelled successfully",
        booking,
    }))
}
