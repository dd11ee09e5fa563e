use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::AppError;

/// ISO 639-1 codes the catalog accepts.
pub const LANGUAGES: [&str; 11] = ["en", "hi", "ta", "te", "kn", "ml", "mr", "pa", "bn", "gu", "ur"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovieStatus {
    Coming,
    Active,
    Ended,
}

impl MovieStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovieStatus::Coming => "coming",
            MovieStatus::Active => "active",
            MovieStatus::Ended => "ended",
        }
    }

    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "coming" => Ok(MovieStatus::Coming),
            "active" => Ok(MovieStatus::Active),
            "ended" => Ok(MovieStatus::Ended),
            other => Err(AppError::InternalWithMsg(format!("Unknown movie status: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub description: String,
    pub genre: Vec<String>,
    pub language: String,
    pub duration_min: i32,
    pub release_date: NaiveDate,
    pub poster_url: String,
    pub rating: f64,
    pub status: MovieStatus,
    pub created_at: DateTime<Utc>,
}

pub struct NewMovieParams {
    pub title: String,
    pub description: String,
    pub genre: Vec<String>,
    pub language: String,
    pub duration_min: i32,
    pub release_date: NaiveDate,
    pub poster_url: String,
    pub status: MovieStatus,
}

impl Movie {
    pub fn new(params: NewMovieParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: params.title,
            description: params.description,
            genre: params.genre,
            language: params.language,
            duration_min: params.duration_min,
            release_date: params.release_date,
            poster_url: params.poster_url,
            rating: 0.0,
            status: params.status,
            created_at: Utc::now(),
        }
    }
}
