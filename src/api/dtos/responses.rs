use crate::domain::models::booking::Booking;
use crate::domain::models::movie::Movie;
use crate::domain::models::showtime::{Seat, Showtime};
use crate::domain::models::user::{Role, User, UserStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            status: user.status,
        }
    }
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Serialize)]
pub struct MovieDetailResponse {
    pub movie: Movie,
    pub showtimes: Vec<Showtime>,
}

#[derive(Serialize)]
pub struct SeatsResponse {
    pub showtime_id: String,
    pub seats: Vec<Seat>,
}

#[derive(Serialize)]
pub struct LockSeatsResponse {
    pub locked_until: DateTime<Utc>,
    pub seats: Vec<String>,
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub booking_id: String,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub total_movies: i64,
    pub total_users: i64,
    pub total_bookings: i64,
    pub total_revenue: f64,
    pub recent_bookings: Vec<Booking>,
}
