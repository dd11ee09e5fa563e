use crate::domain::{
    models::booking::{BookedSeat, Booking, BookingStatus, PaymentStatus},
    ports::BookingRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_booking(row: &PgRow) -> Result<Booking, AppError> {
    let seats_json: String = row.try_get("seats")?;
    let seats: Vec<BookedSeat> = serde_json::from_str(&seats_json)
        .map_err(|e| AppError::InternalWithMsg(format!("Corrupt seat snapshot: {}", e)))?;
    let payment_status: String = row.try_get("payment_status")?;
    let booking_status: String = row.try_get("booking_status")?;

    Ok(Booking {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        showtime_id: row.try_get("showtime_id")?,
        movie_id: row.try_get("movie_id")?,
        seats,
        total_price: row.try_get("total_price")?,
        payment_status: PaymentStatus::parse(&payment_status)?,
        payment_id: row.try_get("payment_id")?,
        booking_status: BookingStatus::parse(&booking_status)?,
        booking_code: row.try_get("booking_code")?,
        created_at: row.try_get("created_at")?,
        expires_at: row.try_get("expires_at")?,
    })
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        let seats_json = serde_json::to_string(&booking.seats)
            .map_err(|e| AppError::InternalWithMsg(format!("Seat snapshot serialization failed: {}", e)))?;

        let row = sqlx::query(
            "INSERT INTO bookings (id, user_id, showtime_id, movie_id, seats, total_price, payment_status, payment_id, booking_status, booking_code, created_at, expires_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING *",
        )
            .bind(&booking.id).bind(&booking.user_id).bind(&booking.showtime_id).bind(&booking.movie_id)
            .bind(&seats_json).bind(booking.total_price).bind(booking.payment_status.as_str())
            .bind(&booking.payment_id).bind(booking.booking_status.as_str()).bind(&booking.booking_code)
            .bind(booking.created_at).bind(booking.expires_at)
            .fetch_one(&self.pool)
            .await?;
        map_booking(&row)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        let row = sqlx::query("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_booking).transpose()
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Booking>, AppError> {
        let rows = sqlx::query("SELECT * FROM bookings WHERE user_id = $1 ORDER BY created_at DESC")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_booking).collect()
    }

    async fn list_all(&self) -> Result<Vec<Booking>, AppError> {
        let rows = sqlx::query("SELECT * FROM bookings ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_booking).collect()
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Booking>, AppError> {
        let rows = sqlx::query("SELECT * FROM bookings ORDER BY created_at DESC LIMIT $1")
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_booking).collect()
    }

    async fn update(&self, booking: &Booking) -> Result<Booking, AppError> {
        let row = sqlx::query(
            "UPDATE bookings SET payment_status = $1, payment_id = $2, booking_status = $3
             WHERE id = $4
             RETURNING *",
        )
            .bind(booking.payment_status.as_str())
            .bind(&booking.payment_id)
            .bind(booking.booking_status.as_str())
            .bind(&booking.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;
        map_booking(&row)
    }

    async fn count(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn completed_revenue(&self) -> Result<f64, AppError> {
        sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(SUM(total_price), 0.0) FROM bookings WHERE payment_status = 'completed'",
        )
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
