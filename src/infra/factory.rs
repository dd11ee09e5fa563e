use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgConnectOptions, PgPoolOptions}, sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}};
use sqlx::{ConnectOptions, PgPool, SqlitePool};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::reservation::ReservationService;
use crate::infra::payment::http_gateway::HttpPaymentGateway;
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_movie_repo::PostgresMovieRepo,
    postgres_showtime_repo::PostgresShowtimeRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_movie_repo::SqliteMovieRepo,
    sqlite_showtime_repo::SqliteShowtimeRepo, sqlite_user_repo::SqliteUserRepo,
};
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let payment_gateway = Arc::new(HttpPaymentGateway::new(
        config.payment_gateway_url.clone(),
        config.payment_key_id.clone(),
        config.payment_key_secret.clone(),
    ));

    let auth_service = Arc::new(AuthService::new(config));

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let showtime_repo = Arc::new(PostgresShowtimeRepo::new(pool.clone()));
        let booking_repo = Arc::new(PostgresBookingRepo::new(pool.clone()));
        let reservations = Arc::new(ReservationService::new(showtime_repo.clone(), booking_repo.clone()));

        AppState {
            config: config.clone(),
            movie_repo: Arc::new(PostgresMovieRepo::new(pool.clone())),
            showtime_repo,
            booking_repo,
            user_repo: Arc::new(PostgresUserRepo::new(pool)),
            payment_gateway,
            auth_service,
            reservations,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let showtime_repo = Arc::new(SqliteShowtimeRepo::new(pool.clone()));
        let booking_repo = Arc::new(SqliteBookingRepo::new(pool.clone()));
        let reservations = Arc::new(ReservationService::new(showtime_repo.clone(), booking_repo.clone()));

        AppState {
            config: config.clone(),
            movie_repo: Arc::new(SqliteMovieRepo::new(pool.clone())),
            showtime_repo,
            booking_repo,
            user_repo: Arc::new(SqliteUserRepo::new(pool)),
            payment_gateway,
            auth_service,
            reservations,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
