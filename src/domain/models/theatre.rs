use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::collections::{HashMap, HashSet};
use crate::domain::models::show_timing::ShowTiming;
use crate::error::AppError;

pub const DEFAULT_SEATS: i32 = 100;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Theatre {
    pub id: String,
    pub name: String,
    pub location: String,
    pub number_of_screens: i32,
    #[sqlx(skip)]
    pub slots: Vec<Slot>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One movie-on-a-screen assignment. Every showtime listed here draws from the
/// same `available_seats` counter.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Slot {
    pub id: String,
    pub theatre_id: String,
    pub movie_id: String,
    pub screen_number: i32,
    #[sqlx(skip)]
    pub show_timings: Vec<String>,
    pub total_seats: i32,
    pub available_seats: i32,
}

/// Unvalidated slot assignment as submitted by an admin.
#[derive(Debug, Deserialize, Clone)]
pub struct SlotAssignment {
    pub movie_id: String,
    pub screen_number: i32,
    pub show_timings: Vec<String>,
    pub total_seats: Option<i32>,
    pub available_seats: Option<i32>,
}

pub struct NewTheatreParams {
    pub name: String,
    pub location: String,
    pub number_of_screens: i32,
    pub assignments: Vec<SlotAssignment>,
}

impl Theatre {
    pub fn new(params: NewTheatreParams) -> Result<Self, AppError> {
        let name = params.name.trim().to_string();
        if name.chars().count() < 3 {
            return Err(AppError::Validation("Theatre name must be at least 3 characters".into()));
        }
        let location = params.location.trim().to_string();
        if location.is_empty() {
            return Err(AppError::Validation("Theatre location is required".into()));
        }
        if params.number_of_screens < 1 {
            return Err(AppError::Validation("number_of_screens must be at least 1".into()));
        }

        let now = Utc::now();
        let mut theatre = Self {
            id: Uuid::new_v4().to_string(),
            name,
            location,
            number_of_screens: params.number_of_screens,
            slots: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        theatre.slots = theatre.build_slots(params.assignments)?;
        Ok(theatre)
    }

    /// Validates assignments against this theatre and turns them into slots.
    pub fn build_slots(&self, assignments: Vec<SlotAssignment>) -> Result<Vec<Slot>, AppError> {
        let mut seen: HashSet<(String, String)> = self.slots.iter()
            .flat_map(|s| s.show_timings.iter().map(|t| (s.movie_id.clone(), t.clone())))
            .collect();

        let mut slots = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let slot = Slot::new(&self.id, self.number_of_screens, assignment)?;
            for timing in &slot.show_timings {
                if !seen.insert((slot.movie_id.clone(), timing.clone())) {
                    return Err(AppError::Conflict(format!(
                        "Movie {} is already scheduled at {} in this theatre", slot.movie_id, timing
                    )));
                }
            }
            slots.push(slot);
        }
        Ok(slots)
    }
}

impl Slot {
    pub fn new(theatre_id: &str, number_of_screens: i32, assignment: SlotAssignment) -> Result<Self, AppError> {
        let movie_id = Uuid::parse_str(assignment.movie_id.trim())
            .map_err(|_| AppError::InvalidReference(format!("Invalid movie id '{}'", assignment.movie_id)))?
            .to_string();

        if assignment.screen_number < 1 || assignment.screen_number > number_of_screens {
            return Err(AppError::Validation(format!(
                "screen_number must be between 1 and {}", number_of_screens
            )));
        }

        if assignment.show_timings.is_empty() {
            return Err(AppError::Validation("At least one show timing is required".into()));
        }
        let mut show_timings: Vec<String> = Vec::with_capacity(assignment.show_timings.len());
        for raw in &assignment.show_timings {
            let timing: ShowTiming = raw.parse()?;
            if show_timings.iter().any(|t| t == timing.as_str()) {
                return Err(AppError::Validation(format!("Duplicate show timing {}", timing)));
            }
            show_timings.push(timing.into());
        }

        let total_seats = assignment.total_seats.unwrap_or(DEFAULT_SEATS);
        if total_seats < 1 {
            return Err(AppError::Validation("total_seats must be at least 1".into()));
        }
        let available_seats = assignment.available_seats.unwrap_or(total_seats);
        if available_seats < 0 || available_seats > total_seats {
            return Err(AppError::Validation("available_seats must be between 0 and total_seats".into()));
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            theatre_id: theatre_id.to_string(),
            movie_id,
            screen_number: assignment.screen_number,
            show_timings,
            total_seats,
            available_seats,
        })
    }

    pub fn can_seat(&self, count: i32) -> bool {
        count <= self.available_seats
    }
}

/// Distributes `(slot_id, show_timing)` rows, already in display order, onto their slots.
pub fn attach_show_timings(slots: &mut [Slot], timings: Vec<(String, String)>) {
    let mut by_slot: HashMap<String, Vec<String>> = HashMap::new();
    for (slot_id, timing) in timings {
        by_slot.entry(slot_id).or_default().push(timing);
    }
    for slot in slots {
        slot.show_timings = by_slot.remove(&slot.id).unwrap_or_default();
    }
}
