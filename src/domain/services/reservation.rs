use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::models::booking::{Booking, BookedSeat, BookingStatus, NewBookingParams, PaymentStatus};
use crate::domain::models::showtime::{SeatStatus, Showtime};
use crate::domain::models::user::Role;
use crate::domain::ports::{BookingRepository, ShowtimeRepository};
use crate::error::AppError;

/// How long a seat lock shields a seat from other users.
pub const LOCK_TTL_MINUTES: i64 = 15;

/// Bounded retries for the read-modify-write cycle when a concurrent writer
/// bumps the showtime version under us.
const MAX_WRITE_ATTEMPTS: u32 = 5;

#[derive(Debug, Serialize)]
pub struct SeatLock {
    pub locked_until: DateTime<Utc>,
    /// Seat numbers this call actually locked; seats already held or booked
    /// are skipped, not errors.
    pub seats: Vec<String>,
}

pub struct CreateBookingParams {
    pub showtime_id: String,
    pub movie_id: String,
    pub seat_numbers: Vec<String>,
    pub user_id: String,
}

/// Coordinates every seat-state transition of a showtime: locking, booking,
/// and release on cancel/refund/expiry. All operations re-sweep expired locks
/// and apply their writes against one consistent snapshot of the showtime,
/// retrying from a fresh read when the optimistic version check fails.
pub struct ReservationService {
    showtime_repo: Arc<dyn ShowtimeRepository>,
    booking_repo: Arc<dyn BookingRepository>,
}

impl ReservationService {
    pub fn new(
        showtime_repo: Arc<dyn ShowtimeRepository>,
        booking_repo: Arc<dyn BookingRepository>,
    ) -> Self {
        Self { showtime_repo, booking_repo }
    }

    async fn load_showtime(&self, showtime_id: &str) -> Result<Showtime, AppError> {
        self.showtime_repo
            .find_by_id(showtime_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Showtime not found".into()))
    }

    /// Seats of a showtime with expired locks reclaimed. The sweep is written
    /// through before the seats are returned, so every reader observes the
    /// same reclaimed state.
    pub async fn seats_for_showtime(&self, showtime_id: &str, now: DateTime<Utc>) -> Result<Showtime, AppError> {
        for _ in 0..MAX_WRITE_ATTEMPTS {
            let mut showtime = self.load_showtime(showtime_id).await?;

            if !showtime.release_expired_locks(now) {
                return Ok(showtime);
            }

            match self.showtime_repo.update_seats(&showtime).await {
                Ok(persisted) => return Ok(persisted),
                Err(AppError::VersionConflict) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(AppError::Conflict("Showtime is being updated concurrently, try again".into()))
    }

    /// Locks every requested seat that is currently available for `user_id`.
    /// Seats in any other state are silently skipped; the response lists what
    /// was actually locked. `locked_until` is fixed at call time and shared
    /// by all seats in the request.
    pub async fn lock_seats(
        &self,
        showtime_id: &str,
        seat_numbers: &[String],
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<SeatLock, AppError> {
        if seat_numbers.is_empty() {
            return Err(AppError::Validation("At least one seat is required".into()));
        }

        let requested = dedup_seat_numbers(seat_numbers);
        let locked_until = now + Duration::minutes(LOCK_TTL_MINUTES);

        for _ in 0..MAX_WRITE_ATTEMPTS {
            let mut showtime = self.load_showtime(showtime_id).await?;
            let swept = showtime.release_expired_locks(now);

            let mut locked = Vec::new();
            for seat_number in &requested {
                if let Some(seat) = showtime.find_seat_mut(seat_number) {
                    if seat.status == SeatStatus::Available {
                        seat.lock(user_id, locked_until);
                        locked.push(seat_number.clone());
                    }
                }
            }

            if !swept && locked.is_empty() {
                return Ok(SeatLock { locked_until, seats: locked });
            }

            match self.showtime_repo.update_seats(&showtime).await {
                Ok(_) => {
                    info!("Locked {} seat(s) on showtime {} for user {}", locked.len(), showtime_id, user_id);
                    return Ok(SeatLock { locked_until, seats: locked });
                }
                Err(AppError::VersionConflict) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(AppError::Conflict("Seats are being updated concurrently, try again".into()))
    }

    /// Books the requested seats all-or-nothing. A seat qualifies when it is
    /// available, or locked by the booking user; anything else fails the
    /// whole request and leaves every seat untouched. The booking record is
    /// written before the seats flip to booked, so a crash in between leaves
    /// locks that expire on their own rather than seats with no booking.
    pub async fn create_booking(&self, params: CreateBookingParams, now: DateTime<Utc>) -> Result<Booking, AppError> {
        if params.seat_numbers.is_empty() {
            return Err(AppError::Validation("At least one seat is required".into()));
        }

        let requested = dedup_seat_numbers(&params.seat_numbers);
        let mut booking: Option<Booking> = None;

        for _ in 0..MAX_WRITE_ATTEMPTS {
            let mut showtime = self.load_showtime(&params.showtime_id).await?;
            if showtime.movie_id != params.movie_id {
                self.abandon_booking(booking.take()).await?;
                return Err(AppError::Validation("Showtime does not belong to the given movie".into()));
            }

            showtime.release_expired_locks(now);

            let mut snapshots = Vec::with_capacity(requested.len());
            for seat_number in &requested {
                match self.bookable_snapshot(&showtime, seat_number, &params.user_id) {
                    Ok(snapshot) => snapshots.push(snapshot),
                    Err(e) => {
                        self.abandon_booking(booking.take()).await?;
                        return Err(e);
                    }
                }
            }

            if booking.is_none() {
                let total_price = showtime.price * requested.len() as f64;
                let record = Booking::new(NewBookingParams {
                    user_id: params.user_id.clone(),
                    showtime_id: params.showtime_id.clone(),
                    movie_id: params.movie_id.clone(),
                    seats: snapshots,
                    total_price,
                    now,
                });
                booking = Some(self.booking_repo.create(&record).await?);
            }

            for seat_number in &requested {
                if let Some(seat) = showtime.find_seat_mut(seat_number) {
                    seat.book(&params.user_id);
                }
            }

            match self.showtime_repo.update_seats(&showtime).await {
                Ok(_) => {
                    let created = booking.take().ok_or(AppError::Internal)?;
                    info!(
                        "Booking {} created for user {} ({} seat(s), total {})",
                        created.booking_code, created.user_id, requested.len(), created.total_price
                    );
                    return Ok(created);
                }
                Err(AppError::VersionConflict) => {
                    warn!("Seat write lost a version race on showtime {}, retrying", params.showtime_id);
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        self.abandon_booking(booking.take()).await?;
        Err(AppError::Conflict("Seats are being updated concurrently, try again".into()))
    }

    fn bookable_snapshot(&self, showtime: &Showtime, seat_number: &str, user_id: &str) -> Result<BookedSeat, AppError> {
        let seat = showtime
            .find_seat(seat_number)
            .ok_or_else(|| AppError::SeatUnavailable(format!("Seat {} does not exist", seat_number)))?;

        match seat.status {
            SeatStatus::Available => Ok(BookedSeat {
                seat_number: seat.seat_number.clone(),
                row: seat.row.clone(),
            }),
            SeatStatus::Locked if seat.locked_by.as_deref() == Some(user_id) => Ok(BookedSeat {
                seat_number: seat.seat_number.clone(),
                row: seat.row.clone(),
            }),
            SeatStatus::Locked => {
                Err(AppError::SeatUnavailable(format!("Seat {} is held by another user", seat_number)))
            }
            SeatStatus::Booked => {
                Err(AppError::SeatUnavailable(format!("Seat {} is already booked", seat_number)))
            }
        }
    }

    /// A booking record created before its seat write failed must not stay
    /// live, or it would claim seats it never got.
    async fn abandon_booking(&self, booking: Option<Booking>) -> Result<(), AppError> {
        if let Some(mut record) = booking {
            record.booking_status = BookingStatus::Cancelled;
            self.booking_repo.update(&record).await?;
            warn!("Abandoned booking {} after failed seat write", record.id);
        }
        Ok(())
    }

    /// Cancels a booking (owner or admin) and releases its seats back to
    /// available. Payment status is untouched; refunds are a separate,
    /// admin-only operation.
    pub async fn cancel_booking(&self, booking_id: &str, actor_id: &str, actor_role: Role) -> Result<Booking, AppError> {
        let mut booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        if booking.user_id != actor_id && actor_role != Role::Admin {
            return Err(AppError::Forbidden("Not authorized to cancel this booking".into()));
        }
        if booking.booking_status == BookingStatus::Cancelled {
            return Err(AppError::AlreadyCancelled);
        }

        booking.booking_status = BookingStatus::Cancelled;
        let cancelled = self.booking_repo.update(&booking).await?;

        self.release_booked_seats(&cancelled).await?;

        info!("Booking {} cancelled by {}", cancelled.id, actor_id);
        Ok(cancelled)
    }

    /// Marks a completed (or failed) payment as refunded and releases the
    /// seats. Pending payments have nothing to refund.
    pub async fn refund_booking(&self, booking_id: &str) -> Result<Booking, AppError> {
        let mut booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        match booking.payment_status {
            PaymentStatus::Refunded => return Err(AppError::AlreadyRefunded),
            PaymentStatus::Pending => return Err(AppError::CannotRefundPending),
            PaymentStatus::Completed | PaymentStatus::Failed => {}
        }

        booking.payment_status = PaymentStatus::Refunded;
        booking.booking_status = BookingStatus::Cancelled;
        let refunded = self.booking_repo.update(&booking).await?;

        self.release_booked_seats(&refunded).await?;

        info!("Booking {} refunded", refunded.id);
        Ok(refunded)
    }

    /// Returns the booking's seats to available on the showtime. Only seats
    /// still booked by the booking's user are touched; a seat that was freed
    /// and re-booked by someone else in the meantime stays theirs.
    async fn release_booked_seats(&self, booking: &Booking) -> Result<(), AppError> {
        for _ in 0..MAX_WRITE_ATTEMPTS {
            let Some(mut showtime) = self.showtime_repo.find_by_id(&booking.showtime_id).await? else {
                // Showtime deleted after booking: nothing left to release.
                return Ok(());
            };

            let mut changed = false;
            for snapshot in &booking.seats {
                if let Some(seat) = showtime.find_seat_mut(&snapshot.seat_number) {
                    if seat.status == SeatStatus::Booked
                        && seat.booked_by.as_deref() == Some(booking.user_id.as_str())
                    {
                        seat.release();
                        changed = true;
                    }
                }
            }

            if !changed {
                return Ok(());
            }

            match self.showtime_repo.update_seats(&showtime).await {
                Ok(_) => return Ok(()),
                Err(AppError::VersionConflict) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(AppError::Conflict("Seats are being updated concurrently, try again".into()))
    }
}

fn dedup_seat_numbers(seat_numbers: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(seat_numbers.len());
    for seat_number in seat_numbers {
        if !unique.contains(seat_number) {
            unique.push(seat_number.clone());
        }
    }
    unique
}
