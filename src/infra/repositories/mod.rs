pub mod sqlite_booking_repo;
pub mod sqlite_movie_repo;
pub mod sqlite_theatre_repo;

pub mod postgres_booking_repo;
pub mod postgres_movie_repo;
pub mod postgres_theatre_repo;
