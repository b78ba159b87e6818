use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use crate::domain::models::show_timing::ShowTiming;

pub const PRICE_PER_TICKET: i64 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Booked,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Booked => "booked",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub movie_id: String,
    pub theatre_id: String,
    pub show_timing: String,
    pub number_of_tickets: i32,
    pub total_amount: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub user_id: String,
    pub movie_id: String,
    pub theatre_id: String,
    pub show_timing: ShowTiming,
    pub number_of_tickets: i32,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: params.user_id,
            movie_id: params.movie_id,
            theatre_id: params.theatre_id,
            show_timing: params.show_timing.into(),
            number_of_tickets: params.number_of_tickets,
            total_amount: PRICE_PER_TICKET * i64::from(params.number_of_tickets),
            status: BookingStatus::Booked.as_str().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == BookingStatus::Cancelled.as_str()
    }
}
