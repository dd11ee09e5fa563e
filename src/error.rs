use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Seats unavailable: {0}")]
    SeatUnavailable(String),
    #[error("Booking already cancelled")]
    AlreadyCancelled,
    #[error("Booking already refunded")]
    AlreadyRefunded,
    #[error("Cannot refund a pending payment")]
    CannotRefundPending,
    #[error("Payment verification failed")]
    PaymentVerificationFailed,
    #[error("Concurrent update, stale version")]
    VersionConflict,
    #[error("Payment gateway error: {0}")]
    Gateway(String),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    let code = db_err.code().unwrap_or_default();

                    // 2067 = SQLite Unique Constraint
                    // 23505 = PostgreSQL Unique Violation
                    if code == "2067" || code == "23505" {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({ "error": "Resource already exists (duplicate entry)" }))
                        ).into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::SeatUnavailable(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::AlreadyCancelled => (StatusCode::BAD_REQUEST, "Booking already cancelled".to_string()),
            AppError::AlreadyRefunded => (StatusCode::BAD_REQUEST, "Booking already refunded".to_string()),
            AppError::CannotRefundPending => (StatusCode::BAD_REQUEST, "Cannot refund a pending payment".to_string()),
            AppError::PaymentVerificationFailed => (StatusCode::BAD_REQUEST, "Payment verification failed".to_string()),
            AppError::VersionConflict => (StatusCode::CONFLICT, "Resource was modified concurrently".to_string()),
            AppError::Gateway(msg) => {
                error!("Payment gateway error: {}", msg);
                (StatusCode::BAD_GATEWAY, "Payment gateway unavailable".to_string())
            }
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
