use crate::domain::models::{
    booking::Booking, movie::Movie, showtime::Showtime, user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait MovieRepository: Send + Sync {
    async fn create(&self, movie: &Movie) -> Result<Movie, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Movie>, AppError>;
    /// Movies shown to customers: `active` and `coming`.
    async fn list_visible(&self) -> Result<Vec<Movie>, AppError>;
    async fn update(&self, movie: &Movie) -> Result<Movie, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn count(&self) -> Result<i64, AppError>;
}

#[async_trait]
pub trait ShowtimeRepository: Send + Sync {
    async fn create(&self, showtime: &Showtime) -> Result<Showtime, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Showtime>, AppError>;
    async fn list_by_movie(&self, movie_id: &str) -> Result<Vec<Showtime>, AppError>;
    async fn list_by_movie_from(&self, movie_id: &str, from: NaiveDate) -> Result<Vec<Showtime>, AppError>;
    async fn list_all(&self) -> Result<Vec<Showtime>, AppError>;
    /// Updates schedule fields and price; never touches the seat array.
    async fn update_metadata(&self, showtime: &Showtime) -> Result<Showtime, AppError>;
    /// Persists the seat array only if the stored version still matches the
    /// one the caller read; fails with `VersionConflict` on a lost race.
    /// On success the returned showtime carries the bumped version.
    async fn update_seats(&self, showtime: &Showtime) -> Result<Showtime, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn list_all(&self) -> Result<Vec<Booking>, AppError>;
    async fn list_recent(&self, limit: i64) -> Result<Vec<Booking>, AppError>;
    /// Persists the mutable lifecycle fields: payment status, payment id,
    /// booking status. Everything else on a booking is immutable history.
    async fn update(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn count(&self) -> Result<i64, AppError>;
    async fn completed_revenue(&self) -> Result<f64, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn list_customers(&self) -> Result<Vec<User>, AppError>;
    async fn update(&self, user: &User) -> Result<User, AppError>;
    async fn count_customers(&self) -> Result<i64, AppError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOrder {
    pub order_ref: String,
    pub amount_minor: i64,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentState {
    Succeeded,
    Processing,
    Failed,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Registers a payable order with the gateway. `amount_minor` is in the
    /// currency's smallest unit.
    async fn create_order(&self, amount_minor: i64, currency: &str, receipt: &str) -> Result<PaymentOrder, AppError>;
    /// Checks the proof-of-payment signature the client relays back.
    fn verify_signature(&self, order_ref: &str, payment_ref: &str, signature: &str) -> bool;
    async fn retrieve_status(&self, payment_ref: &str) -> Result<PaymentState, AppError>;
}
