use axum::{extract::State, response::IntoResponse, Json};
use crate::api::dtos::requests::{ConfirmPaymentRequest, CreateOrderRequest, VerifyPaymentRequest};
use crate::api::dtos::responses::OrderResponse;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::booking::{Booking, BookingStatus, PaymentStatus};
use crate::domain::models::user::Role;
use crate::domain::ports::PaymentState;
use crate::error::AppError;
use crate::state::AppState;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

async fn owned_booking(state: &AppState, booking_id: &str, auth: &AuthUser) -> Result<Booking, AppError> {
    let booking = state.booking_repo.find_by_id(booking_id).await?
        .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

    if booking.user_id != auth.user_id && auth.role != Role::Admin {
        return Err(AppError::Forbidden("Not authorized for this booking".into()));
    }
    Ok(booking)
}

/// Amount handed to the gateway is in the currency's smallest unit.
fn amount_minor(total_price: f64) -> i64 {
    (total_price * 100.0).round() as i64
}

pub async fn create_order(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking = owned_booking(&state, &payload.booking_id, &auth).await?;

    let order = state.payment_gateway
        .create_order(amount_minor(booking.total_price), &state.config.currency, &booking.id)
        .await?;

    info!("Payment order {} created for booking {}", order.order_ref, booking.id);

    Ok(Json(OrderResponse {
        order_id: order.order_ref,
        amount: order.amount_minor,
        currency: order.currency,
        booking_id: booking.id,
    }))
}

/// Marks the booking paid when the relayed proof-of-payment signature checks
/// out. A bad signature marks the payment failed but deliberately leaves the
/// seats booked: releasing them here would let another user grab the seat
/// while the payer retries.
pub async fn verify_payment(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(payload): Json<VerifyPaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut booking = owned_booking(&state, &payload.booking_id, &auth).await?;

    if !state.payment_gateway.verify_signature(&payload.order_id, &payload.payment_id, &payload.signature) {
        booking.payment_status = PaymentStatus::Failed;
        state.booking_repo.update(&booking).await?;
        warn!("Signature verification failed for booking {}", booking.id);
        return Err(AppError::PaymentVerificationFailed);
    }

    booking.payment_status = PaymentStatus::Completed;
    booking.payment_id = Some(payload.payment_id);
    booking.booking_status = BookingStatus::Confirmed;
    let updated = state.booking_repo.update(&booking).await?;

    info!("Payment verified for booking {}", updated.id);

    Ok(Json(json!({
        "message": "Payment verified successfully",
        "booking": updated,
    })))
}

/// Polls the gateway for the payment's state. `processing` leaves the booking
/// untouched so the client can poll again.
pub async fn confirm_payment(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(payload): Json<ConfirmPaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut booking = owned_booking(&state, &payload.booking_id, &auth).await?;

    match state.payment_gateway.retrieve_status(&payload.payment_id).await? {
        PaymentState::Succeeded => {
            booking.payment_status = PaymentStatus::Completed;
            booking.payment_id = Some(payload.payment_id);
            let updated = state.booking_repo.update(&booking).await?;

            info!("Payment confirmed for booking {}", updated.id);

            Ok(Json(json!({
                "message": "Payment confirmed successfully",
                "booking": updated,
            })))
        }
        PaymentState::Processing => Ok(Json(json!({
            "message": "Payment is processing",
            "status": "processing",
            "booking": booking,
        }))),
        PaymentState::Failed => {
            booking.payment_status = PaymentStatus::Failed;
            state.booking_repo.update(&booking).await?;
            warn!("Payment failed for booking {}", booking.id);
            Err(AppError::PaymentVerificationFailed)
        }
    }
}
