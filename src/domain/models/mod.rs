pub mod auth;
pub mod booking;
pub mod movie;
pub mod showtime;
pub mod user;
