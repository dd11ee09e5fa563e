use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub payment_gateway_url: String,
    pub payment_key_id: String,
    pub payment_key_secret: String,
    pub currency: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            payment_gateway_url: env::var("PAYMENT_GATEWAY_URL").unwrap_or_else(|_| "https://api.payment-gateway.local/v1".to_string()),
            payment_key_id: env::var("PAYMENT_KEY_ID").unwrap_or_else(|_| "test-key-id".to_string()),
            payment_key_secret: env::var("PAYMENT_KEY_SECRET").unwrap_or_else(|_| "test-key-secret".to_string()),
            currency: env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "INR".to_string()),
        }
    }
}
