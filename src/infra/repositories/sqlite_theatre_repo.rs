use crate::domain::{models::{theatre::{attach_show_timings, Slot, Theatre}, show_timing::ShowTiming}, ports::TheatreRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;
use tracing::warn;

pub struct SqliteTheatreRepo {
    pool: SqlitePool,
}

impl SqliteTheatreRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn hydrate(&self, mut theatres: Vec<Theatre>) -> Result<Vec<Theatre>, AppError> {
        if theatres.is_empty() {
            return Ok(theatres);
        }
        let mut slots = sqlx::query_as::<_, Slot>("SELECT * FROM theatre_slots ORDER BY theatre_id, screen_number, rowid")
            .fetch_all(&self.pool).await.map_err(AppError::Database)?;
        let timings: Vec<(String, String)> = sqlx::query_as("SELECT slot_id, show_timing FROM slot_show_timings ORDER BY slot_id, position")
            .fetch_all(&self.pool).await.map_err(AppError::Database)?;

        attach_show_timings(&mut slots, timings);
        let mut by_theatre: HashMap<String, Vec<Slot>> = HashMap::new();
        for slot in slots {
            by_theatre.entry(slot.theatre_id.clone()).or_default().push(slot);
        }
        for theatre in &mut theatres {
            theatre.slots = by_theatre.remove(&theatre.id).unwrap_or_default();
        }
        Ok(theatres)
    }
}

async fn insert_slots(conn: &mut SqliteConnection, slots: &[Slot]) -> Result<(), AppError> {
    for slot in slots {
        sqlx::query("INSERT INTO theatre_slots (id, theatre_id, movie_id, screen_number, total_seats, available_seats) VALUES (?, ?, ?, ?, ?, ?)")
            .bind(&slot.id).bind(&slot.theatre_id).bind(&slot.movie_id)
            .bind(slot.screen_number).bind(slot.total_seats).bind(slot.available_seats)
            .execute(&mut *conn).await.map_err(AppError::Database)?;

        for (position, timing) in slot.show_timings.iter().enumerate() {
            sqlx::query("INSERT INTO slot_show_timings (slot_id, theatre_id, movie_id, show_timing, position) VALUES (?, ?, ?, ?, ?)")
                .bind(&slot.id).bind(&slot.theatre_id).bind(&slot.movie_id).bind(timing).bind(position as i64)
                .execute(&mut *conn).await.map_err(AppError::Database)?;
        }
    }
    Ok(())
}

/// Takes `count` seats from the slot only if that many are still available.
pub(crate) async fn reserve_seats_in(conn: &mut SqliteConnection, slot_id: &str, count: i32) -> Result<i32, AppError> {
    let remaining: Option<i32> = sqlx::query_scalar(
        "UPDATE theatre_slots SET available_seats = available_seats - ? WHERE id = ? AND available_seats >= ? RETURNING available_seats"
    )
        .bind(count).bind(slot_id).bind(count)
        .fetch_optional(&mut *conn).await.map_err(AppError::Database)?;

    if let Some(remaining) = remaining {
        return Ok(remaining);
    }

    let available: Option<i32> = sqlx::query_scalar("SELECT available_seats FROM theatre_slots WHERE id = ?")
        .bind(slot_id)
        .fetch_optional(&mut *conn).await.map_err(AppError::Database)?;

    match available {
        Some(available) => {
            warn!(slot_id, requested = count, available, "Seat reservation rejected");
            Err(AppError::InsufficientSeats { requested: count, available })
        }
        None => Err(AppError::SlotNotFound),
    }
}

/// Gives `count` seats back, never exceeding `total_seats`.
pub(crate) async fn release_seats_in(conn: &mut SqliteConnection, slot_id: &str, count: i32) -> Result<Option<i32>, AppError> {
    let restored: Option<i32> = sqlx::query_scalar(
        "UPDATE theatre_slots SET available_seats = available_seats + ? WHERE id = ? AND available_seats + ? <= total_seats RETURNING available_seats"
    )
        .bind(count).bind(slot_id).bind(count)
        .fetch_optional(&mut *conn).await.map_err(AppError::Database)?;

    if restored.is_some() {
        return Ok(restored);
    }

    let clamped: Option<i32> = sqlx::query_scalar(
        "UPDATE theatre_slots SET available_seats = total_seats WHERE id = ? RETURNING available_seats"
    )
        .bind(slot_id)
        .fetch_optional(&mut *conn).await.map_err(AppError::Database)?;

    if clamped.is_some() {
        warn!(slot_id, released = count, "Seat release exceeded capacity; clamped to total seats");
    }
    Ok(clamped)
}

#[async_trait]
impl TheatreRepository for SqliteTheatreRepo {
    async fn create(&self, theatre: &Theatre) -> Result<Theatre, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let mut created = sqlx::query_as::<_, Theatre>(
            "INSERT INTO theatres (id, name, location, number_of_screens, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&theatre.id).bind(&theatre.name).bind(&theatre.location)
            .bind(theatre.number_of_screens).bind(theatre.created_at).bind(theatre.updated_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        insert_slots(&mut tx, &theatre.slots).await?;
        tx.commit().await.map_err(AppError::Database)?;

        created.slots = theatre.slots.clone();
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Theatre>, AppError> {
        let Some(mut theatre) = sqlx::query_as::<_, Theatre>("SELECT * FROM theatres WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)? else {
            return Ok(None);
        };

        let mut slots = sqlx::query_as::<_, Slot>("SELECT * FROM theatre_slots WHERE theatre_id = ? ORDER BY screen_number, rowid")
            .bind(id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)?;
        let timings: Vec<(String, String)> = sqlx::query_as(
            "SELECT slot_id, show_timing FROM slot_show_timings WHERE theatre_id = ? ORDER BY slot_id, position"
        )
            .bind(id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)?;

        attach_show_timings(&mut slots, timings);
        theatre.slots = slots;
        Ok(Some(theatre))
    }

    async fn list(&self) -> Result<Vec<Theatre>, AppError> {
        let theatres = sqlx::query_as::<_, Theatre>("SELECT * FROM theatres ORDER BY created_at ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)?;
        self.hydrate(theatres).await
    }

    async fn assign_slots(&self, theatre_id: &str, slots: &[Slot]) -> Result<Theatre, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let result = sqlx::query("UPDATE theatres SET updated_at = ? WHERE id = ?")
            .bind(Utc::now()).bind(theatre_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Theatre not found".into()));
        }

        insert_slots(&mut tx, slots).await?;
        tx.commit().await.map_err(AppError::Database)?;

        self.find_by_id(theatre_id).await?
            .ok_or(AppError::NotFound("Theatre not found".into()))
    }

    async fn resolve_slot(&self, theatre_id: &str, movie_id: &str, show_timing: &ShowTiming) -> Result<Slot, AppError> {
        let theatre_exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM theatres WHERE id = ?")
            .bind(theatre_id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?;
        if theatre_exists.is_none() {
            return Err(AppError::SlotNotFound);
        }

        let mut slot = sqlx::query_as::<_, Slot>(
            "SELECT s.* FROM slot_show_timings t
             JOIN theatre_slots s ON s.id = t.slot_id
             WHERE t.theatre_id = ? AND t.movie_id = ? AND t.show_timing = ?
             ORDER BY s.screen_number
             LIMIT 1"
        )
            .bind(theatre_id).bind(movie_id).bind(show_timing.as_str())
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::SlotNotAssigned)?;

        slot.show_timings = sqlx::query_scalar("SELECT show_timing FROM slot_show_timings WHERE slot_id = ? ORDER BY position")
            .bind(&slot.id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)?;
        Ok(slot)
    }

    async fn reserve_seats(&self, slot_id: &str, count: i32) -> Result<i32, AppError> {
        let mut conn = self.pool.acquire().await.map_err(AppError::Database)?;
        reserve_seats_in(&mut conn, slot_id, count).await
    }

    async fn release_seats(&self, slot_id: &str, count: i32) -> Result<Option<i32>, AppError> {
        let mut conn = self.pool.acquire().await.map_err(AppError::Database)?;
        release_seats_in(&mut conn, slot_id, count).await
    }
}
