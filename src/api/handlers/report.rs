use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::{AdminUser, CustomerUser};
use crate::error::AppError;
use std::sync::Arc;

pub async fn list_user_history(
    State(state): State<Arc<AppState>>,
    CustomerUser(user): CustomerUser,
) -> Result<impl IntoResponse, AppError> {
    let history = state.reports.user_history(&user.id).await?;
    Ok(Json(history))
}

pub async fn list_popular_movies(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let movies = state.reports.popular_movies().await?;
    Ok(Json(movies))
}

pub async fn list_theatre_bookings(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(theatre_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let summary = state.reports.theatre_summary(&theatre_id).await?;
    Ok(Json(summary))
}
