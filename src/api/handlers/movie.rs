use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::api::dtos::responses::MovieDetailResponse;
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use std::sync::Arc;

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let movies = state.movie_repo.list_visible().await?;
    Ok(Json(movies))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let movie = state.movie_repo.find_by_id(&movie_id).await?
        .ok_or_else(|| AppError::NotFound("Movie not found".into()))?;

    let showtimes = state.showtime_repo
        .list_by_movie_from(&movie.id, Utc::now().date_naive())
        .await?;

    Ok(Json(MovieDetailResponse { movie, showtimes }))
}

pub async fn list_movie_showtimes(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if state.movie_repo.find_by_id(&movie_id).await?.is_none() {
        return Err(AppError::NotFound("Movie not found".into()));
    }

    let showtimes = state.showtime_repo.list_by_movie(&movie_id).await?;
    Ok(Json(showtimes))
}
