use crate::domain::models::{
    booking::Booking, movie::Movie, theatre::{Slot, Theatre}, show_timing::ShowTiming,
    report::{PopularMovie, TheatreBookingSummary, BookingHistoryEntry},
};
use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait MovieRepository: Send + Sync {
    async fn create(&self, movie: &Movie) -> Result<Movie, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Movie>, AppError>;
    async fn list(&self) -> Result<Vec<Movie>, AppError>;
}

/// Theatres and the seat-bearing slots embedded in them.
#[async_trait]
pub trait TheatreRepository: Send + Sync {
    async fn create(&self, theatre: &Theatre) -> Result<Theatre, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Theatre>, AppError>;
    async fn list(&self) -> Result<Vec<Theatre>, AppError>;
    /// Appends slots to an existing theatre.
    async fn assign_slots(&self, theatre_id: &str, slots: &[Slot]) -> Result<Theatre, AppError>;

    /// `SlotNotFound` when the theatre is missing, `SlotNotAssigned` when no slot
    /// of that theatre lists the movie at the given showtime.
    async fn resolve_slot(&self, theatre_id: &str, movie_id: &str, show_timing: &ShowTiming) -> Result<Slot, AppError>;
    /// Conditional decrement; returns the seats left.
    async fn reserve_seats(&self, slot_id: &str, count: i32) -> Result<i32, AppError>;
    /// Increment capped at `total_seats`; `None` if the slot no longer exists.
    async fn release_seats(&self, slot_id: &str, count: i32) -> Result<Option<i32>, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Reserves seats on `slot_id` and inserts the booking in one transaction.
    async fn create_reserving(&self, booking: &Booking, slot_id: &str) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    /// Flips `booked -> cancelled` and releases seats in one transaction.
    async fn cancel_releasing(&self, booking: &Booking, slot_id: Option<&str>) -> Result<Booking, AppError>;

    async fn list_popular_movies(&self) -> Result<Vec<PopularMovie>, AppError>;
    async fn list_theatre_summary(&self, theatre_id: &str) -> Result<Vec<TheatreBookingSummary>, AppError>;
    async fn list_user_history(&self, user_id: &str) -> Result<Vec<BookingHistoryEntry>, AppError>;
}
