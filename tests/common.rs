use cinema_backend::{
    api::router::create_router,
    config::Config,
    domain::ports::{PaymentGateway, PaymentOrder, PaymentState},
    domain::services::{auth_service::AuthService, reservation::ReservationService},
    error::AppError,
    infra::repositories::{
        sqlite_booking_repo::SqliteBookingRepo,
        sqlite_movie_repo::SqliteMovieRepo,
        sqlite_showtime_repo::SqliteShowtimeRepo,
        sqlite_user_repo::SqliteUserRepo,
    },
    state::AppState,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

/// Gateway double used by every test. Orders echo the receipt, the only
/// accepted proof signature is "valid-signature", and the payment reference
/// prefix picks the reported state.
pub struct MockPaymentGateway;

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_order(&self, amount_minor: i64, currency: &str, receipt: &str) -> Result<PaymentOrder, AppError> {
        Ok(PaymentOrder {
            order_ref: format!("order_{}", receipt),
            amount_minor,
            currency: currency.to_string(),
        })
    }

    fn verify_signature(&self, _order_ref: &str, _payment_ref: &str, signature: &str) -> bool {
        signature == "valid-signature"
    }

    async fn retrieve_status(&self, payment_ref: &str) -> Result<PaymentState, AppError> {
        if payment_ref.starts_with("pay_ok") {
            Ok(PaymentState::Succeeded)
        } else if payment_ref.starts_with("pay_wait") {
            Ok(PaymentState::Processing)
        } else {
            Ok(PaymentState::Failed)
        }
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret: "test-jwt-secret".to_string(),
            payment_gateway_url: "http://localhost".to_string(),
            payment_key_id: "key".to_string(),
            payment_key_secret: "secret".to_string(),
            currency: "INR".to_string(),
        };

        let showtime_repo = Arc::new(SqliteShowtimeRepo::new(pool.clone()));
        let booking_repo = Arc::new(SqliteBookingRepo::new(pool.clone()));
        let reservations = Arc::new(ReservationService::new(showtime_repo.clone(), booking_repo.clone()));

        let state = Arc::new(AppState {
            config: config.clone(),
            movie_repo: Arc::new(SqliteMovieRepo::new(pool.clone())),
            showtime_repo,
            booking_repo,
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            payment_gateway: Arc::new(MockPaymentGateway),
            auth_service: Arc::new(AuthService::new(&config)),
            reservations,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(payload) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Response {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> Response {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Response {
        self.send(Method::DELETE, uri, token, None).await
    }

    /// Registers a user and returns `(token, user_id)`.
    pub async fn register_user(&self, name: &str, email: &str) -> (String, String) {
        let res = self.post("/api/v1/auth/register", None, json!({
            "name": name,
            "email": email,
            "password": "secret-password"
        })).await;

        assert_eq!(res.status(), 201, "registration failed for {}", email);
        let body = parse_body(res).await;
        (
            body["token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    /// Registers a user, flips its role to admin in the database, and logs in
    /// again so the returned token carries the admin role.
    pub async fn register_admin(&self, email: &str) -> String {
        let (_, user_id) = self.register_user("Admin", email).await;

        sqlx::query("UPDATE users SET role = 'admin' WHERE id = ?")
            .bind(&user_id)
            .execute(&self.pool)
            .await
            .expect("Failed to promote test admin");

        self.login(email).await
    }

    pub async fn login(&self, email: &str) -> String {
        let res = self.post("/api/v1/auth/login", None, json!({
            "email": email,
            "password": "secret-password"
        })).await;

        assert_eq!(res.status(), 200, "login failed for {}", email);
        let body = parse_body(res).await;
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn create_movie(&self, admin_token: &str) -> String {
        let res = self.post("/api/v1/admin/movies", Some(admin_token), json!({
            "title": "Interstellar",
            "description": "A team travels through a wormhole in space.",
            "genre": ["sci-fi", "drama"],
            "language": "en",
            "duration_min": 169,
            "release_date": "2024-11-07",
            "poster_url": "https://example.com/interstellar.jpg"
        })).await;

        assert_eq!(res.status(), 201, "movie creation failed");
        let body = parse_body(res).await;
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn create_showtime(&self, admin_token: &str, movie_id: &str, total_seats: i32, price: f64) -> String {
        let res = self.post("/api/v1/admin/showtimes", Some(admin_token), json!({
            "movie_id": movie_id,
            "date": "2030-06-01",
            "start_time": "18:00",
            "end_time": "21:00",
            "theater": "Screen 1",
            "total_seats": total_seats,
            "price": price
        })).await;

        assert_eq!(res.status(), 201, "showtime creation failed");
        let body = parse_body(res).await;
        body["id"].as_str().unwrap().to_string()
    }

    /// Books the given seats and returns the booking id.
    pub async fn book_seats(&self, token: &str, showtime_id: &str, movie_id: &str, seats: &[&str]) -> String {
        let res = self.post("/api/v1/bookings", Some(token), json!({
            "showtime_id": showtime_id,
            "movie_id": movie_id,
            "seats": seats
        })).await;

        assert_eq!(res.status(), 201, "booking failed for seats {:?}", seats);
        let body = parse_body(res).await;
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn seat_status(&self, showtime_id: &str, seat_number: &str) -> Value {
        let res = self.get(&format!("/api/v1/showtimes/{}/seats", showtime_id), None).await;
        assert_eq!(res.status(), 200);
        let body = parse_body(res).await;

        body["seats"].as_array().unwrap().iter()
            .find(|s| s["seat_number"] == seat_number)
            .cloned()
            .unwrap_or(Value::Null)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
