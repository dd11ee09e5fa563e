use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};

/// Fixed theater rows. Seats per row is derived from the total seat count.
pub const SEAT_ROWS: [&str; 10] = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Locked,
    Booked,
}

/// A single seat embedded in its showtime. Seats are never addressed outside
/// their showtime; all mutation goes through the transition methods below so
/// the holder/expiry fields always agree with the status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    pub seat_number: String,
    pub row: String,
    pub status: SeatStatus,
    pub locked_by: Option<String>,
    pub locked_until: Option<DateTime<Utc>>,
    pub booked_by: Option<String>,
}

impl Seat {
    fn new(seat_number: String, row: String) -> Self {
        Self {
            seat_number,
            row,
            status: SeatStatus::Available,
            locked_by: None,
            locked_until: None,
            booked_by: None,
        }
    }

    pub fn lock(&mut self, user_id: &str, until: DateTime<Utc>) {
        self.status = SeatStatus::Locked;
        self.locked_by = Some(user_id.to_string());
        self.locked_until = Some(until);
        self.booked_by = None;
    }

    pub fn book(&mut self, user_id: &str) {
        self.status = SeatStatus::Booked;
        self.booked_by = Some(user_id.to_string());
        self.locked_by = None;
        self.locked_until = None;
    }

    pub fn release(&mut self) {
        self.status = SeatStatus::Available;
        self.locked_by = None;
        self.locked_until = None;
        self.booked_by = None;
    }

    pub fn lock_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == SeatStatus::Locked
            && self.locked_until.map(|until| until < now).unwrap_or(true)
    }
}

/// Deterministic seat layout: rows A..J, `ceil(total_seats / 10)` seats per
/// row, filled row-major and truncated at `total_seats` (the last row may be
/// partial). All seats start available.
pub fn generate_seat_layout(total_seats: i32) -> Vec<Seat> {
    let total = total_seats.max(0) as usize;
    let seats_per_row = total.div_ceil(SEAT_ROWS.len());

    let mut seats = Vec::with_capacity(total);
    for row in SEAT_ROWS {
        for number in 1..=seats_per_row {
            if seats.len() >= total {
                return seats;
            }
            seats.push(Seat::new(format!("{}{}", row, number), row.to_string()));
        }
    }
    seats
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Showtime {
    pub id: String,
    pub movie_id: String,
    pub date: NaiveDate,
    /// Local wall-clock "HH:MM".
    pub start_time: String,
    pub end_time: String,
    pub theater: String,
    pub total_seats: i32,
    pub price: f64,
    pub seats: Vec<Seat>,
    /// Optimistic concurrency token; bumped by every persisted seat write.
    #[serde(skip)]
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

pub struct NewShowtimeParams {
    pub movie_id: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub theater: String,
    pub total_seats: i32,
    pub price: f64,
}

impl Showtime {
    pub fn new(params: NewShowtimeParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            movie_id: params.movie_id,
            date: params.date,
            start_time: params.start_time,
            end_time: params.end_time,
            theater: params.theater,
            total_seats: params.total_seats,
            price: params.price,
            seats: generate_seat_layout(params.total_seats),
            version: 0,
            created_at: Utc::now(),
        }
    }

    pub fn find_seat(&self, seat_number: &str) -> Option<&Seat> {
        self.seats.iter().find(|s| s.seat_number == seat_number)
    }

    pub fn find_seat_mut(&mut self, seat_number: &str) -> Option<&mut Seat> {
        self.seats.iter_mut().find(|s| s.seat_number == seat_number)
    }

    /// Reclaims every seat whose lock has outlived its TTL. Returns whether
    /// anything changed; callers must persist the showtime when it did.
    pub fn release_expired_locks(&mut self, now: DateTime<Utc>) -> bool {
        let mut changed = false;
        for seat in &mut self.seats {
            if seat.lock_expired(now) {
                seat.release();
                changed = true;
            }
        }
        changed
    }

    pub fn booked_seat_count(&self) -> usize {
        self.seats.iter().filter(|s| s.status == SeatStatus::Booked).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn layout_fills_rows_in_order_and_truncates() {
        let seats = generate_seat_layout(23);
        assert_eq!(seats.len(), 23);
        // 23 seats over 10 rows -> 3 per row, last row partial.
        assert_eq!(seats[0].seat_number, "A1");
        assert_eq!(seats[2].seat_number, "A3");
        assert_eq!(seats[3].seat_number, "B1");
        assert_eq!(seats[22].seat_number, "H2");
        assert!(seats.iter().all(|s| s.status == SeatStatus::Available));
    }

    #[test]
    fn layout_is_deterministic() {
        let a = generate_seat_layout(100);
        let b = generate_seat_layout(100);
        let numbers_a: Vec<_> = a.iter().map(|s| s.seat_number.clone()).collect();
        let numbers_b: Vec<_> = b.iter().map(|s| s.seat_number.clone()).collect();
        assert_eq!(numbers_a, numbers_b);
        assert_eq!(a.len(), 100);
        assert_eq!(a.last().unwrap().seat_number, "J10");
    }

    #[test]
    fn layout_handles_zero_seats() {
        assert!(generate_seat_layout(0).is_empty());
    }

    fn showtime_with_seats(total: i32) -> Showtime {
        Showtime::new(NewShowtimeParams {
            movie_id: "m1".into(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            start_time: "18:00".into(),
            end_time: "20:30".into(),
            theater: "Screen 1".into(),
            total_seats: total,
            price: 200.0,
        })
    }

    #[test]
    fn expired_locks_are_released_and_sweep_is_idempotent() {
        let mut showtime = showtime_with_seats(4);
        let now = Utc::now();

        showtime.find_seat_mut("A1").unwrap().lock("u1", now - Duration::minutes(1));
        showtime.find_seat_mut("A2").unwrap().lock("u2", now + Duration::minutes(10));

        assert!(showtime.release_expired_locks(now));

        let a1 = showtime.find_seat("A1").unwrap();
        assert_eq!(a1.status, SeatStatus::Available);
        assert!(a1.locked_by.is_none());
        assert!(a1.locked_until.is_none());

        // The unexpired lock survives the sweep.
        assert_eq!(showtime.find_seat("A2").unwrap().status, SeatStatus::Locked);

        // A second sweep at the same instant changes nothing.
        assert!(!showtime.release_expired_locks(now));
    }

    #[test]
    fn seat_transitions_keep_holder_fields_consistent() {
        let mut showtime = showtime_with_seats(2);
        let until = Utc::now() + Duration::minutes(15);

        let seat = showtime.find_seat_mut("A1").unwrap();
        seat.lock("u1", until);
        assert_eq!(seat.status, SeatStatus::Locked);
        assert_eq!(seat.locked_by.as_deref(), Some("u1"));
        assert_eq!(seat.locked_until, Some(until));

        seat.book("u1");
        assert_eq!(seat.status, SeatStatus::Booked);
        assert_eq!(seat.booked_by.as_deref(), Some("u1"));
        assert!(seat.locked_by.is_none());
        assert!(seat.locked_until.is_none());

        seat.release();
        assert_eq!(seat.status, SeatStatus::Available);
        assert!(seat.booked_by.is_none());
    }
}
