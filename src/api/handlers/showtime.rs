use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::api::dtos::responses::SeatsResponse;
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use std::sync::Arc;

pub async fn get_showtime(
    State(state): State<Arc<AppState>>,
    Path(showtime_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let showtime = state.showtime_repo.find_by_id(&showtime_id).await?
        .ok_or_else(|| AppError::NotFound("Showtime not found".into()))?;

    Ok(Json(showtime))
}

/// Seats are returned post-sweep: any lock whose TTL ran out is reclaimed
/// (and persisted) before the array is serialized.
pub async fn get_showtime_seats(
    State(state): State<Arc<AppState>>,
    Path(showtime_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let showtime = state.reservations.seats_for_showtime(&showtime_id, Utc::now()).await?;

    Ok(Json(SeatsResponse {
        showtime_id: showtime.id,
        seats: showtime.seats,
    }))
}
