use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AdminUser;
use crate::api::dtos::requests::CreateMovieRequest;
use crate::domain::models::movie::{Movie, NewMovieParams};
use crate::domain::services::ledger::parse_reference;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<CreateMovieRequest>,
) -> Result<impl IntoResponse, AppError> {
    let movie = Movie::new(NewMovieParams {
        name: payload.name,
        genre: payload.genre,
        language: payload.language,
        duration: payload.duration,
        movie_image: payload.movie_image,
        cast: payload.cast,
        director: payload.director,
        release_date: payload.release_date,
    })?;

    let created = state.movie_repo.create(&movie).await?;
    info!("Created movie: {} ({})", created.name, created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let movies = state.movie_repo.list().await?;
    Ok(Json(movies))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let movie_id = parse_reference(&movie_id, "movieId")?;
    let movie = state.movie_repo.find_by_id(&movie_id).await?
        .ok_or(AppError::NotFound("Movie not found".into()))?;
    Ok(Json(movie))
}
