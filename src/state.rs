use std::sync::Arc;
use crate::domain::ports::{
    BookingRepository, MovieRepository, PaymentGateway, ShowtimeRepository, UserRepository,
};
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::reservation::ReservationService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub movie_repo: Arc<dyn MovieRepository>,
    pub showtime_repo: Arc<dyn ShowtimeRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub payment_gateway: Arc<dyn PaymentGateway>,
    pub auth_service: Arc<AuthService>,
    pub reservations: Arc<ReservationService>,
}
