use crate::domain::models::booking::BookingStatus;
use crate::domain::models::movie::MovieStatus;
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateMovieRequest {
    pub title: String,
    pub description: String,
    pub genre: Vec<String>,
    pub language: String,
    pub duration_min: i32,
    pub release_date: NaiveDate,
    pub poster_url: String,
    pub status: Option<MovieStatus>,
}

#[derive(Deserialize)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre: Option<Vec<String>>,
    pub language: Option<String>,
    pub duration_min: Option<i32>,
    pub release_date: Option<NaiveDate>,
    pub poster_url: Option<String>,
    pub rating: Option<f64>,
    pub status: Option<MovieStatus>,
}

#[derive(Deserialize)]
pub struct CreateShowtimeRequest {
    pub movie_id: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub theater: String,
    pub total_seats: i32,
    pub price: f64,
}

#[derive(Deserialize)]
pub struct UpdateShowtimeRequest {
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub theater: Option<String>,
    pub price: Option<f64>,
}

#[derive(Deserialize)]
pub struct LockSeatsRequest {
    pub showtime_id: String,
    pub seats: Vec<String>,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub showtime_id: String,
    pub movie_id: String,
    pub seats: Vec<String>,
}

#[derive(Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub booking_status: BookingStatus,
}

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub booking_id: String,
}

#[derive(Deserialize)]
pub struct VerifyPaymentRequest {
    pub booking_id: String,
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

#[derive(Deserialize)]
pub struct ConfirmPaymentRequest {
    pub booking_id: String,
    pub payment_id: String,
}
