use crate::domain::{models::showtime::{Seat, Showtime}, ports::ShowtimeRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{postgres::PgRow, PgPool, Row};

pub struct PostgresShowtimeRepo {
    pool: PgPool,
}

impl PostgresShowtimeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_showtime(row: &PgRow) -> Result<Showtime, AppError> {
    let seats_json: String = row.try_get("seats")?;
    let seats: Vec<Seat> = serde_json::from_str(&seats_json)
        .map_err(|e| AppError::InternalWithMsg(format!("Corrupt seat payload: {}", e)))?;

    Ok(Showtime {
        id: row.try_get("id")?,
        movie_id: row.try_get("movie_id")?,
        date: row.try_get("date")?,
        start_time: row.try_get("start_time")?,
        end_time: row.try_get("end_time")?,
        theater: row.try_get("theater")?,
        total_seats: row.try_get("total_seats")?,
        price: row.try_get("price")?,
        seats,
        version: row.try_get("version")?,
        created_at: row.try_get("created_at")?,
    })
}

fn seats_to_json(showtime: &Showtime) -> Result<String, AppError> {
    serde_json::to_string(&showtime.seats)
        .map_err(|e| AppError::InternalWithMsg(format!("Seat serialization failed: {}", e)))
}

#[async_trait]
impl ShowtimeRepository for PostgresShowtimeRepo {
    async fn create(&self, showtime: &Showtime) -> Result<Showtime, AppError> {
        let seats_json = seats_to_json(showtime)?;

        let row = sqlx::query(
            "INSERT INTO showtimes (id, movie_id, date, start_time, end_time, theater, total_seats, price, seats, version, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING *",
        )
            .bind(&showtime.id).bind(&showtime.movie_id).bind(showtime.date)
            .bind(&showtime.start_time).bind(&showtime.end_time).bind(&showtime.theater)
            .bind(showtime.total_seats).bind(showtime.price).bind(&seats_json)
            .bind(showtime.version).bind(showtime.created_at)
            .fetch_one(&self.pool)
            .await?;
        map_showtime(&row)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Showtime>, AppError> {
        let row = sqlx::query("SELECT * FROM showtimes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_showtime).transpose()
    }

    async fn list_by_movie(&self, movie_id: &str) -> Result<Vec<Showtime>, AppError> {
        let rows = sqlx::query("SELECT * FROM showtimes WHERE movie_id = $1 ORDER BY date ASC, start_time ASC")
            .bind(movie_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_showtime).collect()
    }

    async fn list_by_movie_from(&self, movie_id: &str, from: NaiveDate) -> Result<Vec<Showtime>, AppError> {
        let rows = sqlx::query(
            "SELECT * FROM showtimes WHERE movie_id = $1 AND date >= $2 ORDER BY date ASC, start_time ASC",
        )
            .bind(movie_id)
            .bind(from)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_showtime).collect()
    }

    async fn list_all(&self) -> Result<Vec<Showtime>, AppError> {
        let rows = sqlx::query("SELECT * FROM showtimes ORDER BY date ASC, start_time ASC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_showtime).collect()
    }

    async fn update_metadata(&self, showtime: &Showtime) -> Result<Showtime, AppError> {
        let row = sqlx::query(
            "UPDATE showtimes SET date = $1, start_time = $2, end_time = $3, theater = $4, price = $5
             WHERE id = $6
             RETURNING *",
        )
            .bind(showtime.date).bind(&showtime.start_time).bind(&showtime.end_time)
            .bind(&showtime.theater).bind(showtime.price).bind(&showtime.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Showtime not found".into()))?;
        map_showtime(&row)
    }

    async fn update_seats(&self, showtime: &Showtime) -> Result<Showtime, AppError> {
        let seats_json = seats_to_json(showtime)?;

        // Conditional write: only lands if nobody else persisted a newer seat
        // array since this showtime was read.
        let row = sqlx::query(
            "UPDATE showtimes SET seats = $1, version = version + 1
             WHERE id = $2 AND version = $3
             RETURNING *",
        )
            .bind(&seats_json)
            .bind(&showtime.id)
            .bind(showtime.version)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => map_showtime(&row),
            None => Err(AppError::VersionConflict),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM showtimes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Showtime not found".into()));
        }
        Ok(())
    }
}
