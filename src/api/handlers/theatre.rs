use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AdminUser;
use crate::api::dtos::requests::{AssignMoviesRequest, CreateTheatreRequest};
use crate::domain::models::theatre::{NewTheatreParams, Theatre};
use crate::domain::services::ledger::parse_reference;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_theatre(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<CreateTheatreRequest>,
) -> Result<impl IntoResponse, AppError> {
    let theatre = Theatre::new(NewTheatreParams {
        name: payload.name,
        location: payload.location,
        number_of_screens: payload.number_of_screens,
        assignments: payload.slots,
    })?;

    let created = state.theatre_repo.create(&theatre).await?;
    info!("Created theatre: {} with {} slots", created.id, created.slots.len());
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_theatres(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let theatres = state.theatre_repo.list().await?;
    Ok(Json(theatres))
}

pub async fn get_theatre(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(theatre_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let theatre_id = parse_reference(&theatre_id, "theaterId")?;
    let theatre = state.theatre_repo.find_by_id(&theatre_id).await?
        .ok_or(AppError::NotFound("Theatre not found".into()))?;
    Ok(Json(theatre))
}

pub async fn assign_movies(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(theatre_id): Path<String>,
    Json(payload): Json<AssignMoviesRequest>,
) -> Result<impl IntoResponse, AppError> {
    let theatre_id = parse_reference(&theatre_id, "theaterId")?;
    let theatre = state.theatre_repo.find_by_id(&theatre_id).await?
        .ok_or(AppError::NotFound("Theatre not found".into()))?;

    if payload.slots.is_empty() {
        return Err(AppError::Validation("At least one slot must be assigned".into()));
    }
    let slots = theatre.build_slots(payload.slots)?;

    let updated = state.theatre_repo.assign_slots(&theatre.id, &slots).await?;
    info!("Assigned {} slots to theatre {}", slots.len(), updated.id);
    Ok(Json(updated))
}
