use std::sync::Arc;
use crate::domain::{
    models::report::{BookingHistoryEntry, PopularMovie, TheatreBookingSummary},
    ports::BookingRepository,
    services::ledger::parse_reference,
};
use crate::error::AppError;

/// Read-only reporting over the ledger. Empty results are returned as empty
/// vectors, never as errors.
pub struct BookingQueryService {
    booking_repo: Arc<dyn BookingRepository>,
}

impl BookingQueryService {
    pub fn new(booking_repo: Arc<dyn BookingRepository>) -> Self {
        Self { booking_repo }
    }

    pub async fn popular_movies(&self) -> Result<Vec<PopularMovie>, AppError> {
        self.booking_repo.list_popular_movies().await
    }

    pub async fn theatre_summary(&self, theatre_id: &str) -> Result<Vec<TheatreBookingSummary>, AppError> {
        let theatre_id = parse_reference(theatre_id, "theaterId")?;
        self.booking_repo.list_theatre_summary(&theatre_id).await
    }

    pub async fn user_history(&self, user_id: &str) -> Result<Vec<BookingHistoryEntry>, AppError> {
        let user_id = parse_reference(user_id, "userId")?;
        self.booking_repo.list_user_history(&user_id).await
    }
}
