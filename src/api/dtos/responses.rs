use crate::domain::models::booking::Booking;
use serde::Serialize;

#[derive(Serialize)]
pub struct BookingResponse {
    pub message: &'static str,
    pub booking: Booking,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
