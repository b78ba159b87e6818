use std::sync::Arc;
use uuid::Uuid;
use tracing::{info, warn};
use crate::domain::{
    models::{booking::{Booking, NewBookingParams}, show_timing::ShowTiming},
    ports::{BookingRepository, TheatreRepository},
};
use crate::error::AppError;

pub struct CreateBookingCommand {
    pub user_id: String,
    pub movie_id: String,
    pub theatre_id: String,
    pub show_timing: String,
    pub number_of_tickets: i32,
}

/// Orchestrates booking creation and cancellation against the slot registry.
///
/// Seat reservation and the booking write always happen inside a single storage
/// transaction, so a failed insert never leaves seats decremented and a failed
/// release never leaves a booking cancelled with its seats still taken.
pub struct BookingLedger {
    theatre_repo: Arc<dyn TheatreRepository>,
    booking_repo: Arc<dyn BookingRepository>,
}

impl BookingLedger {
    pub fn new(theatre_repo: Arc<dyn TheatreRepository>, booking_repo: Arc<dyn BookingRepository>) -> Self {
        Self { theatre_repo, booking_repo }
    }

    pub async fn create_booking(&self, cmd: CreateBookingCommand) -> Result<Booking, AppError> {
        let user_id = parse_reference(&cmd.user_id, "userId")?;
        let movie_id = parse_reference(&cmd.movie_id, "movieId")?;
        let theatre_id = parse_reference(&cmd.theatre_id, "theaterId")?;

        if cmd.number_of_tickets < 1 {
            return Err(AppError::Validation("number_of_tickets must be at least 1".into()));
        }
        let show_timing: ShowTiming = cmd.show_timing.parse()?;

        let slot = self.theatre_repo.resolve_slot(&theatre_id, &movie_id, &show_timing).await?;

        // The conditional update in the repository is authoritative; this only
        // saves a write transaction for requests that cannot possibly fit.
        if !slot.can_seat(cmd.number_of_tickets) {
            warn!(slot_id = %slot.id, requested = cmd.number_of_tickets, available = slot.available_seats, "Booking rejected: not enough seats");
            return Err(AppError::InsufficientSeats {
                requested: cmd.number_of_tickets,
                available: slot.available_seats,
            });
        }

        let booking = Booking::new(NewBookingParams {
            user_id,
            movie_id,
            theatre_id,
            show_timing,
            number_of_tickets: cmd.number_of_tickets,
        });

        let created = self.booking_repo.create_reserving(&booking, &slot.id).await?;
        info!(
            booking_id = %created.id,
            slot_id = %slot.id,
            tickets = created.number_of_tickets,
            amount = created.total_amount,
            "Booking created"
        );
        Ok(created)
    }

    pub async fn cancel_booking(&self, booking_id: &str, user_id: &str) -> Result<Booking, AppError> {
        let booking_id = parse_reference(booking_id, "bookingId")?;
        let user_id = parse_reference(user_id, "userId")?;

        let booking = self.booking_repo.find_by_id(&booking_id).await?
            .ok_or(AppError::BookingNotFound)?;

        if booking.user_id != user_id {
            warn!(booking_id = %booking.id, "Cancellation rejected: booking belongs to another user");
            return Err(AppError::NotAuthorized);
        }
        if booking.is_cancelled() {
            return Err(AppError::AlreadyCancelled);
        }

        let slot_id = match booking.show_timing.parse::<ShowTiming>() {
            Ok(timing) => match self.theatre_repo.resolve_slot(&booking.theatre_id, &booking.movie_id, &timing).await {
                Ok(slot) => Some(slot.id),
                Err(AppError::SlotNotFound | AppError::SlotNotAssigned) => None,
                Err(e) => return Err(e),
            },
            Err(_) => None,
        };
        if slot_id.is_none() {
            warn!(booking_id = %booking.id, "Originating slot no longer exists; cancelling without releasing seats");
        }

        let cancelled = self.booking_repo.cancel_releasing(&booking, slot_id.as_deref()).await?;
        info!(booking_id = %cancelled.id, tickets = cancelled.number_of_tickets, "Booking cancelled");
        Ok(cancelled)
    }
}

/// Normalises an id to its canonical hyphenated UUID form.
pub fn parse_reference(raw: &str, field: &str) -> Result<String, AppError> {
    Uuid::parse_str(raw.trim())
        .map(|id| id.to_string())
        .map_err(|_| AppError::InvalidReference(format!("Invalid {} '{}'", field, raw)))
}
