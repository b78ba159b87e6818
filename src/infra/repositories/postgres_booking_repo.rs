use crate::domain::{
    models::{booking::Booking, report::{BookingHistoryEntry, BookingHistoryRow, PopularMovie, TheatreBookingSummary}},
    ports::BookingRepository,
};
use crate::error::AppError;
use crate::infra::repositories::postgres_theatre_repo::{release_seats_in, reserve_seats_in};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, warn};

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn create_reserving(&self, booking: &Booking, slot_id: &str) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Row lock on the slot is held until commit; concurrent reservers re-check the predicate.
        let remaining = reserve_seats_in(&mut tx, slot_id, booking.number_of_tickets).await?;

        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, user_id, movie_id, theatre_id, show_timing, number_of_tickets, total_amount, status, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.user_id).bind(&booking.movie_id).bind(&booking.theatre_id)
            .bind(&booking.show_timing).bind(booking.number_of_tickets).bind(booking.total_amount)
            .bind(&booking.status).bind(booking.created_at).bind(booking.updated_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        debug!(booking_id = %created.id, slot_id, remaining, "Seats reserved");
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn cancel_releasing(&self, booking: &Booking, slot_id: Option<&str>) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let cancelled = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = 'cancelled', updated_at = $1 WHERE id = $2 AND status = 'booked' RETURNING *"
        )
            .bind(Utc::now()).bind(&booking.id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or(AppError::AlreadyCancelled)?;

        if let Some(slot_id) = slot_id {
            match release_seats_in(&mut tx, slot_id, cancelled.number_of_tickets).await? {
                Some(available) => debug!(booking_id = %cancelled.id, slot_id, available, "Seats released"),
                None => warn!(booking_id = %cancelled.id, slot_id, "Slot vanished before seats could be released"),
            }
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(cancelled)
    }

    async fn list_popular_movies(&self) -> Result<Vec<PopularMovie>, AppError> {
        sqlx::query_as::<_, PopularMovie>(
            "SELECT b.movie_id AS movie_id, m.name AS name, m.genre AS genre, m.language AS language,
                    CAST(SUM(b.number_of_tickets) AS BIGINT) AS total_tickets_booked
             FROM bookings b
             JOIN movies m ON m.id = b.movie_id
             WHERE b.status = 'booked'
             GROUP BY b.movie_id, m.name, m.genre, m.language
             ORDER BY total_tickets_booked DESC, m.name ASC"
        )
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_theatre_summary(&self, theatre_id: &str) -> Result<Vec<TheatreBookingSummary>, AppError> {
        sqlx::query_as::<_, TheatreBookingSummary>(
            "SELECT b.movie_id AS movie_id, m.name AS movie_name, m.genre AS genre, b.show_timing AS show_timing,
                    CAST(SUM(b.number_of_tickets) AS BIGINT) AS total_tickets_booked,
                    CAST(SUM(b.total_amount) AS BIGINT) AS total_revenue
             FROM bookings b
             JOIN movies m ON m.id = b.movie_id
             WHERE b.theatre_id = $1 AND b.status = 'booked'
             GROUP BY b.movie_id, m.name, m.genre, b.show_timing
             ORDER BY m.name ASC, b.show_timing ASC"
        )
            .bind(theatre_id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_user_history(&self, user_id: &str) -> Result<Vec<BookingHistoryEntry>, AppError> {
        let rows = sqlx::query_as::<_, BookingHistoryRow>(
            "SELECT b.id AS id, b.show_timing AS show_timing, b.number_of_tickets AS number_of_tickets,
                    b.total_amount AS total_amount, b.status AS status, b.created_at AS created_at,
                    m.name AS movie_name, m.genre AS movie_genre, m.language AS movie_language, m.duration AS movie_duration,
                    t.name AS theatre_name, t.location AS theatre_location
             FROM bookings b
             JOIN movies m ON m.id = b.movie_id
             JOIN theatres t ON t.id = b.theatre_id
             WHERE b.user_id = $1
             ORDER BY b.created_at DESC"
        )
            .bind(user_id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)?;

        Ok(rows.into_iter().map(BookingHistoryEntry::from).collect())
    }
}
