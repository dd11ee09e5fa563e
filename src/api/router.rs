use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::api::handlers::{admin, auth, booking, health, movie, payment, showtime};
use crate::state::AppState;
use tower_http::{
    classify::ServerErrorsFailureClass,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/me", get(auth::me))

        // Catalog
        .route("/api/v1/movies", get(movie::list_movies))
        .route("/api/v1/movies/{movie_id}", get(movie::get_movie))
        .route("/api/v1/movies/{movie_id}/showtimes", get(movie::list_movie_showtimes))
        .route("/api/v1/showtimes/{showtime_id}", get(showtime::get_showtime))
        .route("/api/v1/showtimes/{showtime_id}/seats", get(showtime::get_showtime_seats))

        // Booking flow
        .route("/api/v1/bookings/lock-seats", post(booking::lock_seats))
        .route("/api/v1/bookings", post(booking::create_booking))
        .route("/api/v1/bookings/mine", get(booking::my_bookings))
        .route("/api/v1/bookings/{booking_id}", get(booking::get_booking))
        .route("/api/v1/bookings/{booking_id}/cancel", post(booking::cancel_booking))

        // Payments
        .route("/api/v1/payments/orders", post(payment::create_order))
        .route("/api/v1/payments/verify", post(payment::verify_payment))
        .route("/api/v1/payments/confirm", post(payment::confirm_payment))

        // Admin
        .route("/api/v1/admin/movies", post(admin::create_movie))
        .route("/api/v1/admin/movies/{movie_id}", put(admin::update_movie).delete(admin::delete_movie))
        .route("/api/v1/admin/showtimes", post(admin::create_showtime).get(admin::list_showtimes))
        .route("/api/v1/admin/showtimes/{showtime_id}", put(admin::update_showtime).delete(admin::delete_showtime))
        .route("/api/v1/admin/bookings", get(admin::list_bookings))
        .route("/api/v1/admin/bookings/{booking_id}", put(admin::update_booking_status))
        .route("/api/v1/admin/bookings/{booking_id}/refund", post(admin::refund_booking))
        .route("/api/v1/admin/stats", get(admin::stats))
        .route("/api/v1/admin/users", get(admin::list_users))
        .route("/api/v1/admin/users/{user_id}/promote", post(admin::promote_user))
        .route("/api/v1/admin/users/{user_id}/ban", post(admin::ban_user))
        .route("/api/v1/admin/users/{user_id}/unban", post(admin::unban_user))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
