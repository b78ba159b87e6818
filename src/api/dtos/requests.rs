use crate::domain::models::theatre::SlotAssignment;
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub show_timing: String,
    pub number_of_tickets: i32,
}

#[derive(Deserialize)]
pub struct CreateMovieRequest {
    pub name: String,
    pub genre: String,
    pub language: String,
    pub duration: String,
    pub movie_image: Option<String>,
    pub cast: Vec<String>,
    pub director: String,
    pub release_date: NaiveDate,
}

#[derive(Deserialize)]
pub struct CreateTheatreRequest {
    pub name: String,
    pub location: String,
    pub number_of_screens: i32,
    #[serde(default)]
    pub slots: Vec<SlotAssignment>,
}

#[derive(Deserialize)]
pub struct AssignMoviesRequest {
    pub slots: Vec<SlotAssignment>,
}
