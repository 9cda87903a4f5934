use async_trait::async_trait;
use kernel::gateway::payment::{PaymentGateway, PaymentIntent};
use kernel::model::id::BookingId;
use serde::Deserialize;
use shared::{
    config::GatewayConfig,
    error::{AppError, AppResult},
};
use std::time::Duration;

/// Stripe の PaymentIntent API を叩くゲートウェイ実装。
/// 失敗・タイムアウトは ExternalServiceError として返し、
/// 予約側の状態には触れない。
pub struct StripePaymentGateway {
    http: reqwest::Client,
    endpoint: String,
    secret_key: String,
}

impl StripePaymentGateway {
    pub fn new(config: &GatewayConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::ExternalServiceError(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            secret_key: config.secret_key.clone(),
        })
    }
}

#[derive(Deserialize)]
struct IntentResponse {
    id: String,
    client_secret: String,
}

#[async_trait]
impl PaymentGateway for StripePaymentGateway {
    async fn create_intent(
        &self,
        booking_id: BookingId,
        amount_minor: i64,
    ) -> AppResult<PaymentIntent> {
        let params = [
            ("amount", amount_minor.to_string()),
            ("currency", "usd".to_string()),
            ("metadata[bookingId]", booking_id.to_string()),
        ];

        let res = self
            .http
            .post(format!("{}/v1/payment_intents", self.endpoint))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("payment gateway request failed: {e}"))
            })?;

        if !res.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "payment gateway returned status {}",
                res.status()
            )));
        }

        let body: IntentResponse = res.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("payment gateway response malformed: {e}"))
        })?;

        Ok(PaymentIntent {
            intent_id: body.id,
            client_secret: body.client_secret,
        })
    }
}
