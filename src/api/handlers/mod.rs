pub mod admin;
pub mod auth;
pub mod booking;
pub mod health;
pub mod movie;
pub mod payment;
pub mod showtime;
