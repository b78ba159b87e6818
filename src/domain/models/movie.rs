use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Movie {
    pub id: String,
    pub name: String,
    pub genre: String,
    pub language: String,
    pub duration: String,
    pub movie_image: Option<String>,
    #[serde(rename = "cast")]
    #[sqlx(json)]
    pub cast_members: Vec<String>,
    pub director: String,
    pub release_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

pub struct NewMovieParams {
    pub name: String,
    pub genre: String,
    pub language: String,
    pub duration: String,
    pub movie_image: Option<String>,
    pub cast: Vec<String>,
    pub director: String,
    pub release_date: NaiveDate,
}

impl Movie {
    pub fn new(params: NewMovieParams) -> Result<Self, AppError> {
        let name = params.name.trim().to_string();
        if name.chars().count() < 3 {
            return Err(AppError::Validation("Movie name must be at least 3 characters".into()));
        }
        let genre = required(params.genre, "genre")?;
        let language = required(params.language, "language")?;
        let director = required(params.director, "director")?;

        let duration = params.duration.trim().to_string();
        if !is_valid_duration(&duration) {
            return Err(AppError::Validation("duration must look like '2h 30m'".into()));
        }

        let cast_members: Vec<String> = params.cast.iter().map(|c| c.trim().to_string()).collect();
        if cast_members.is_empty() {
            return Err(AppError::Validation("cast must list at least one member".into()));
        }
        if cast_members.iter().any(|c| c.chars().count() < 2) {
            return Err(AppError::Validation("cast member names must be at least 2 characters".into()));
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name,
            genre,
            language,
            duration,
            movie_image: params.movie_image.filter(|url| !url.trim().is_empty()),
            cast_members,
            director,
            release_date: params.release_date,
            created_at: Utc::now(),
        })
    }
}

fn required(value: String, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// `<hours>h`, optionally followed by a space and `<minutes>[m]`.
fn is_valid_duration(value: &str) -> bool {
    let Some((hours, rest)) = value.split_once('h') else {
        return false;
    };
    if hours.is_empty() || !hours.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let rest = rest.strip_prefix(' ').unwrap_or(rest);
    let minutes = rest.strip_suffix('m').unwrap_or(rest);
    minutes.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_format() {
        for ok in ["2h", "2h 30m", "2h30m", "1h 5", "10h 0m"] {
            assert!(is_valid_duration(ok), "{} should be accepted", ok);
        }
        for bad in ["", "h 30m", "2 h", "2h  30m", "90m", "2h 3x"] {
            assert!(!is_valid_duration(bad), "{} should be rejected", bad);
        }
    }
}
