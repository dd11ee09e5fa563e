use crate::domain::ports::{PaymentGateway, PaymentOrder, PaymentState};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::error;

/// Client for the hosted payment gateway. Requests carry a SHA-256 token
/// derived from the request fields and the merchant secret; the gateway echoes
/// the same scheme in the proof-of-payment signature the browser relays back.
pub struct HttpPaymentGateway {
    client: Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl HttpPaymentGateway {
    pub fn new(base_url: String, key_id: String, key_secret: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            key_id,
            key_secret,
        }
    }

    fn order_token(&self, amount_minor: i64, currency: &str, receipt: &str) -> String {
        sha256_hex(&format!("{}|{}|{}|{}", amount_minor, currency, receipt, self.key_secret))
    }

    fn status_token(&self, payment_ref: &str) -> String {
        sha256_hex(&format!("{}|{}", payment_ref, self.key_secret))
    }
}

fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Serialize)]
struct CreateOrderPayload<'a> {
    key_id: &'a str,
    token: String,
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

#[derive(Deserialize)]
struct OrderCreated {
    order_id: String,
    amount: i64,
    currency: String,
}

#[derive(Serialize)]
struct StatusPayload<'a> {
    key_id: &'a str,
    token: String,
    payment_ref: &'a str,
}

#[derive(Deserialize)]
struct StatusResponse {
    status: String,
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_order(&self, amount_minor: i64, currency: &str, receipt: &str) -> Result<PaymentOrder, AppError> {
        let payload = CreateOrderPayload {
            key_id: &self.key_id,
            token: self.order_token(amount_minor, currency, receipt),
            amount: amount_minor,
            currency,
            receipt,
        };

        let res = self.client
            .post(format!("{}/orders", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!("Payment gateway connection error: {}", e);
                AppError::Gateway(format!("Connection error: {}", e))
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(AppError::Gateway(format!("Order creation failed. Status: {}, Body: {}", status, text)));
        }

        let order: OrderCreated = res.json().await
            .map_err(|e| AppError::Gateway(format!("Malformed order response: {}", e)))?;

        Ok(PaymentOrder {
            order_ref: order.order_id,
            amount_minor: order.amount,
            currency: order.currency,
        })
    }

    fn verify_signature(&self, order_ref: &str, payment_ref: &str, signature: &str) -> bool {
        let expected = sha256_hex(&format!("{}|{}|{}", order_ref, payment_ref, self.key_secret));
        expected == signature
    }

    async fn retrieve_status(&self, payment_ref: &str) -> Result<PaymentState, AppError> {
        let payload = StatusPayload {
            key_id: &self.key_id,
            token: self.status_token(payment_ref),
            payment_ref,
        };

        let res = self.client
            .post(format!("{}/payments/status", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!("Payment gateway connection error: {}", e);
                AppError::Gateway(format!("Connection error: {}", e))
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(AppError::Gateway(format!("Status lookup failed. Status: {}, Body: {}", status, text)));
        }

        let body: StatusResponse = res.json().await
            .map_err(|e| AppError::Gateway(format!("Malformed status response: {}", e)))?;

        match body.status.as_str() {
            "succeeded" => Ok(PaymentState::Succeeded),
            "processing" => Ok(PaymentState::Processing),
            "failed" => Ok(PaymentState::Failed),
            other => Err(AppError::Gateway(format!("Unknown payment state: {}", other))),
        }
    }
}
