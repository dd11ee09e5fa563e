use crate::domain::{models::movie::{Movie, MovieStatus}, ports::MovieRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

pub struct PostgresMovieRepo {
    pool: PgPool,
}

impl PostgresMovieRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_movie(row: &PgRow) -> Result<Movie, AppError> {
    let genre_json: String = row.try_get("genre")?;
    let status: String = row.try_get("status")?;

    Ok(Movie {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        genre: serde_json::from_str(&genre_json)
            .map_err(|e| AppError::InternalWithMsg(format!("Corrupt genre payload: {}", e)))?,
        language: row.try_get("language")?,
        duration_min: row.try_get("duration_min")?,
        release_date: row.try_get("release_date")?,
        poster_url: row.try_get("poster_url")?,
        rating: row.try_get("rating")?,
        status: MovieStatus::parse(&status)?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl MovieRepository for PostgresMovieRepo {
    async fn create(&self, movie: &Movie) -> Result<Movie, AppError> {
        let genre_json = serde_json::to_string(&movie.genre)
            .map_err(|e| AppError::InternalWithMsg(format!("Genre serialization failed: {}", e)))?;

        let row = sqlx::query(
            "INSERT INTO movies (id, title, description, genre, language, duration_min, release_date, poster_url, rating, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING *",
        )
            .bind(&movie.id).bind(&movie.title).bind(&movie.description).bind(&genre_json)
            .bind(&movie.language).bind(movie.duration_min).bind(movie.release_date)
            .bind(&movie.poster_url).bind(movie.rating).bind(movie.status.as_str()).bind(movie.created_at)
            .fetch_one(&self.pool)
            .await?;
        map_movie(&row)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Movie>, AppError> {
        let row = sqlx::query("SELECT * FROM movies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_movie).transpose()
    }

    async fn list_visible(&self) -> Result<Vec<Movie>, AppError> {
        let rows = sqlx::query("SELECT * FROM movies WHERE status IN ('active', 'coming') ORDER BY release_date DESC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_movie).collect()
    }

    async fn update(&self, movie: &Movie) -> Result<Movie, AppError> {
        let genre_json = serde_json::to_string(&movie.genre)
            .map_err(|e| AppError::InternalWithMsg(format!("Genre serialization failed: {}", e)))?;

        let row = sqlx::query(
            "UPDATE movies SET title = $1, description = $2, genre = $3, language = $4, duration_min = $5, release_date = $6, poster_url = $7, rating = $8, status = $9
             WHERE id = $10
             RETURNING *",
        )
            .bind(&movie.title).bind(&movie.description).bind(&genre_json).bind(&movie.language)
            .bind(movie.duration_min).bind(movie.release_date).bind(&movie.poster_url)
            .bind(movie.rating).bind(movie.status.as_str()).bind(&movie.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Movie not found".into()))?;
        map_movie(&row)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Movie not found".into()));
        }
        Ok(())
    }

    async fn count(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM movies")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
