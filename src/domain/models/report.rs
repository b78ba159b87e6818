use serde::Serialize;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, FromRow, Clone)]
pub struct PopularMovie {
    pub movie_id: String,
    pub name: String,
    pub genre: String,
    pub language: String,
    pub total_tickets_booked: i64,
}

#[derive(Debug, Serialize, FromRow, Clone)]
pub struct TheatreBookingSummary {
    pub movie_id: String,
    pub movie_name: String,
    pub genre: String,
    pub show_timing: String,
    pub total_tickets_booked: i64,
    pub total_revenue: i64,
}

#[derive(Debug, FromRow, Clone)]
pub struct BookingHistoryRow {
    pub id: String,
    pub show_timing: String,
    pub number_of_tickets: i32,
    pub total_amount: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub movie_name: String,
    pub movie_genre: String,
    pub movie_language: String,
    pub movie_duration: String,
    pub theatre_name: String,
    pub theatre_location: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct BookingHistoryEntry {
    pub id: String,
    pub show_timing: String,
    pub number_of_tickets: i32,
    pub total_amount: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub movie: MovieSummary,
    pub theatre: TheatreSummary,
}

#[derive(Debug, Serialize, Clone)]
pub struct MovieSummary {
    pub name: String,
    pub genre: String,
    pub language: String,
    pub duration: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct TheatreSummary {
    pub name: String,
    pub location: String,
}

impl From<BookingHistoryRow> for BookingHistoryEntry {
    fn from(row: BookingHistoryRow) -> Self {
        Self {
            id: row.id,
            show_timing: row.show_timing,
            number_of_tickets: row.number_of_tickets,
            total_amount: row.total_amount,
            status: row.status,
            created_at: row.created_at,
            movie: MovieSummary {
                name: row.movie_name,
                genre: row.movie_genre,
                language: row.movie_language,
                duration: row.movie_duration,
            },
            theatre: TheatreSummary {
                name: row.theatre_name,
                location: row.theatre_location,
            },
        }
    }
}
