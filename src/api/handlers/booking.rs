use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::requests::{CreateBookingRequest, LockSeatsRequest};
use crate::api::dtos::responses::LockSeatsResponse;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::user::Role;
use crate::domain::services::reservation::CreateBookingParams;
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use std::sync::Arc;

pub async fn lock_seats(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(payload): Json<LockSeatsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let lock = state.reservations
        .lock_seats(&payload.showtime_id, &payload.seats, &auth.user_id, Utc::now())
        .await?;

    Ok(Json(LockSeatsResponse {
        locked_until: lock.locked_until,
        seats: lock.seats,
    }))
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.reservations
        .create_booking(
            CreateBookingParams {
                showtime_id: payload.showtime_id,
                movie_id: payload.movie_id,
                seat_numbers: payload.seats,
                user_id: auth.user_id,
            },
            Utc::now(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn my_bookings(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_repo.list_by_user(&auth.user_id).await?;
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

    if booking.user_id != auth.user_id && auth.role != Role::Admin {
        return Err(AppError::Forbidden("Not authorized to view this booking".into()));
    }

    Ok(Json(booking))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.reservations
        .cancel_booking(&booking_id, &auth.user_id, auth.role)
        .await?;

    Ok(Json(booking))
}
