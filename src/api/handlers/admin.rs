use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::requests::{
    CreateMovieRequest, CreateShowtimeRequest, UpdateBookingStatusRequest,
    UpdateMovieRequest, UpdateShowtimeRequest,
};
use crate::api::dtos::responses::{StatsResponse, UserProfile};
use crate::api::extractors::auth::AdminUser;
use crate::domain::models::booking::BookingStatus;
use crate::domain::models::movie::{Movie, MovieStatus, NewMovieParams, LANGUAGES};
use crate::domain::models::showtime::{NewShowtimeParams, Showtime};
use crate::domain::models::user::{Role, UserStatus};
use crate::error::AppError;
use crate::state::AppState;
use chrono::NaiveTime;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

fn validate_wall_clock(label: &str, value: &str) -> Result<(), AppError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map(|_| ())
        .map_err(|_| AppError::Validation(format!("{} must be in HH:MM format", label)))
}

/* ---------- Movies ---------- */

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<CreateMovieRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".into()));
    }
    if payload.description.trim().is_empty() {
        return Err(AppError::Validation("Description is required".into()));
    }
    if payload.genre.is_empty() {
        return Err(AppError::Validation("At least one genre is required".into()));
    }
    if !LANGUAGES.contains(&payload.language.as_str()) {
        return Err(AppError::Validation("Invalid language selected".into()));
    }
    if payload.duration_min <= 0 {
        return Err(AppError::Validation("Duration must be positive".into()));
    }
    if !payload.poster_url.starts_with("http://") && !payload.poster_url.starts_with("https://") {
        return Err(AppError::Validation("Valid poster URL is required".into()));
    }

    let movie = Movie::new(NewMovieParams {
        title: payload.title,
        description: payload.description,
        genre: payload.genre,
        language: payload.language,
        duration_min: payload.duration_min,
        release_date: payload.release_date,
        poster_url: payload.poster_url,
        status: payload.status.unwrap_or(MovieStatus::Active),
    });

    let created = state.movie_repo.create(&movie).await?;
    info!("Movie created: {} ({})", created.title, created.id);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(movie_id): Path<String>,
    Json(payload): Json<UpdateMovieRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut movie = state.movie_repo.find_by_id(&movie_id).await?
        .ok_or_else(|| AppError::NotFound("Movie not found".into()))?;

    if let Some(title) = payload.title { movie.title = title; }
    if let Some(description) = payload.description { movie.description = description; }
    if let Some(genre) = payload.genre { movie.genre = genre; }
    if let Some(language) = payload.language {
        if !LANGUAGES.contains(&language.as_str()) {
            return Err(AppError::Validation("Invalid language selected".into()));
        }
        movie.language = language;
    }
    if let Some(duration_min) = payload.duration_min { movie.duration_min = duration_min; }
    if let Some(release_date) = payload.release_date { movie.release_date = release_date; }
    if let Some(poster_url) = payload.poster_url { movie.poster_url = poster_url; }
    if let Some(rating) = payload.rating {
        if !(0.0..=10.0).contains(&rating) {
            return Err(AppError::Validation("Rating must be between 0 and 10".into()));
        }
        movie.rating = rating;
    }
    if let Some(status) = payload.status { movie.status = status; }

    let updated = state.movie_repo.update(&movie).await?;
    info!("Movie updated: {}", updated.id);

    Ok(Json(updated))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(movie_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.movie_repo.delete(&movie_id).await?;
    info!("Movie deleted: {}", movie_id);
    Ok(Json(json!({ "status": "deleted" })))
}

/* ---------- Showtimes ---------- */

pub async fn create_showtime(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<CreateShowtimeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if state.movie_repo.find_by_id(&payload.movie_id).await?.is_none() {
        return Err(AppError::NotFound("Movie not found".into()));
    }
    if payload.total_seats <= 0 {
        return Err(AppError::Validation("Total seats must be positive".into()));
    }
    if payload.price < 0.0 {
        return Err(AppError::Validation("Price must not be negative".into()));
    }
    validate_wall_clock("Start time", &payload.start_time)?;
    validate_wall_clock("End time", &payload.end_time)?;
    if payload.theater.trim().is_empty() {
        return Err(AppError::Validation("Theater is required".into()));
    }

    let showtime = Showtime::new(NewShowtimeParams {
        movie_id: payload.movie_id,
        date: payload.date,
        start_time: payload.start_time,
        end_time: payload.end_time,
        theater: payload.theater,
        total_seats: payload.total_seats,
        price: payload.price,
    });

    let created = state.showtime_repo.create(&showtime).await?;
    info!("Showtime created: {} ({} seats)", created.id, created.total_seats);

    Ok((StatusCode::CREATED, Json(created)))
}

/// Updates schedule metadata only; the seat array is owned by the
/// reservation flow and never edited here.
pub async fn update_showtime(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(showtime_id): Path<String>,
    Json(payload): Json<UpdateShowtimeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut showtime = state.showtime_repo.find_by_id(&showtime_id).await?
        .ok_or_else(|| AppError::NotFound("Showtime not found".into()))?;

    if let Some(date) = payload.date { showtime.date = date; }
    if let Some(start_time) = payload.start_time {
        validate_wall_clock("Start time", &start_time)?;
        showtime.start_time = start_time;
    }
    if let Some(end_time) = payload.end_time {
        validate_wall_clock("End time", &end_time)?;
        showtime.end_time = end_time;
    }
    if let Some(theater) = payload.theater { showtime.theater = theater; }
    if let Some(price) = payload.price {
        if price < 0.0 {
            return Err(AppError::Validation("Price must not be negative".into()));
        }
        showtime.price = price;
    }

    let updated = state.showtime_repo.update_metadata(&showtime).await?;
    info!("Showtime updated: {}", updated.id);

    Ok(Json(updated))
}

/// Deleting a showtime also detaches it from its movie; with showtimes keyed
/// by movie_id the row removal is the detachment.
pub async fn delete_showtime(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(showtime_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.showtime_repo.delete(&showtime_id).await?;
    info!("Showtime deleted: {}", showtime_id);
    Ok(Json(json!({ "status": "deleted" })))
}

pub async fn list_showtimes(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let showtimes = state.showtime_repo.list_all().await?;
    Ok(Json(showtimes))
}

/* ---------- Bookings ---------- */

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_repo.list_all().await?;
    Ok(Json(bookings))
}

/// Admin status override. Cancellation goes through the reservation flow so
/// the booking's seats are released like any other cancel.
pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(booking_id): Path<String>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.booking_status == BookingStatus::Cancelled {
        let cancelled = state.reservations
            .cancel_booking(&booking_id, &admin.user_id, Role::Admin)
            .await?;
        return Ok(Json(cancelled));
    }

    let mut booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

    booking.booking_status = payload.booking_status;
    let updated = state.booking_repo.update(&booking).await?;

    info!("Booking {} status set to {}", updated.id, updated.booking_status.as_str());
    Ok(Json(updated))
}

pub async fn refund_booking(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let refunded = state.reservations.refund_booking(&booking_id).await?;
    Ok(Json(refunded))
}

/* ---------- Dashboard ---------- */

pub async fn stats(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let total_movies = state.movie_repo.count().await?;
    let total_users = state.user_repo.count_customers().await?;
    let total_bookings = state.booking_repo.count().await?;
    let total_revenue = state.booking_repo.completed_revenue().await?;
    let recent_bookings = state.booking_repo.list_recent(10).await?;

    Ok(Json(StatsResponse {
        total_movies,
        total_users,
        total_bookings,
        total_revenue,
        recent_bookings,
    }))
}

/* ---------- Users ---------- */

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let users = state.user_repo.list_customers().await?;
    let profiles: Vec<UserProfile> = users.into_iter().map(UserProfile::from).collect();
    Ok(Json(profiles))
}

pub async fn promote_user(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut user = state.user_repo.find_by_id(&user_id).await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if user.role == Role::Admin {
        return Err(AppError::Validation("User is already an admin".into()));
    }

    user.role = Role::Admin;
    let updated = state.user_repo.update(&user).await?;

    info!("User promoted to admin: {}", updated.id);
    Ok(Json(UserProfile::from(updated)))
}

pub async fn ban_user(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut user = state.user_repo.find_by_id(&user_id).await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if user.status == UserStatus::Banned {
        return Err(AppError::Validation("User is already banned".into()));
    }

    user.status = UserStatus::Banned;
    let updated = state.user_repo.update(&user).await?;

    info!("User banned: {}", updated.id);
    Ok(Json(UserProfile::from(updated)))
}

pub async fn unban_user(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut user = state.user_repo.find_by_id(&user_id).await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if user.status == UserStatus::Active {
        return Err(AppError::Validation("User is already active".into()));
    }

    user.status = UserStatus::Active;
    let updated = state.user_repo.update(&user).await?;

    info!("User unbanned: {}", updated.id);
    Ok(Json(UserProfile::from(updated)))
}
