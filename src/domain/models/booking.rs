use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};

use crate::error::AppError;

/// How long a pending booking (and the seat locks feeding it) stays valid.
pub const BOOKING_WINDOW_MINUTES: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }

    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "pending" => Ok(PaymentStatus::Pending),
            "completed" => Ok(PaymentStatus::Completed),
            "failed" => Ok(PaymentStatus::Failed),
            "refunded" => Ok(PaymentStatus::Refunded),
            other => Err(AppError::InternalWithMsg(format!("Unknown payment status: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(AppError::InternalWithMsg(format!("Unknown booking status: {}", other))),
        }
    }
}

/// Snapshot of a seat at booking time. Copied out of the showtime, so later
/// seat mutation never rewrites booking history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedSeat {
    pub seat_number: String,
    pub row: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub showtime_id: String,
    pub movie_id: String,
    pub seats: Vec<BookedSeat>,
    pub total_price: f64,
    pub payment_status: PaymentStatus,
    pub payment_id: Option<String>,
    pub booking_status: BookingStatus,
    pub booking_code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub user_id: String,
    pub showtime_id: String,
    pub movie_id: String,
    pub seats: Vec<BookedSeat>,
    pub total_price: f64,
    pub now: DateTime<Utc>,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: params.user_id,
            showtime_id: params.showtime_id,
            movie_id: params.movie_id,
            seats: params.seats,
            total_price: params.total_price,
            payment_status: PaymentStatus::Pending,
            payment_id: None,
            booking_status: BookingStatus::Confirmed,
            booking_code: generate_booking_code(params.now),
            created_at: params.now,
            expires_at: params.now + Duration::minutes(BOOKING_WINDOW_MINUTES),
        }
    }
}

/// Human-readable code handed to the customer, e.g. `BOOK-1718031622000-K7Q2M9X4A`.
pub fn generate_booking_code(now: DateTime<Utc>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(char::from)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    format!("BOOK-{}-{}", now.timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_code_shape() {
        let now = Utc::now();
        let code = generate_booking_code(now);
        let parts: Vec<&str> = code.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "BOOK");
        assert_eq!(parts[1], now.timestamp_millis().to_string());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn new_booking_defaults() {
        let now = Utc::now();
        let booking = Booking::new(NewBookingParams {
            user_id: "u1".into(),
            showtime_id: "s1".into(),
            movie_id: "m1".into(),
            seats: vec![BookedSeat { seat_number: "A1".into(), row: "A".into() }],
            total_price: 200.0,
            now,
        });

        assert_eq!(booking.payment_status, PaymentStatus::Pending);
        assert_eq!(booking.booking_status, BookingStatus::Confirmed);
        assert!(booking.payment_id.is_none());
        assert_eq!(booking.expires_at, now + Duration::minutes(15));
    }
}
