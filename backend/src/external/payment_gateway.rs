//! Payment gateway client
//!
//! Capability interface over the external payment processor. The lot
//! lifecycle never calls this; it is invoked only at order-payment time by
//! the checkout front-end flow.

use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PaymentGatewayConfig;
use crate::error::{AppError, AppResult};

/// Payment gateway API client
#[derive(Clone)]
pub struct PaymentGatewayClient {
    client: Client,
    endpoint: String,
    key_id: String,
    key_secret: String,
}

/// A payment order created at the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: String,
}

/// Outcome of a payment verification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentVerification {
    pub payment_id: String,
    pub verified: bool,
}

#[derive(Serialize)]
struct CreateOrderRequest {
    amount: Decimal,
    currency: &'static str,
    receipt: String,
}

impl PaymentGatewayClient {
    pub fn new(config: &PaymentGatewayConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.endpoint.clone(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
        }
    }

    /// Create a payment order at the gateway for a placed order.
    ///
    /// Amounts are submitted in the smallest currency unit.
    pub async fn create_payment_order(
        &self,
        order_id: &str,
        amount: Decimal,
    ) -> AppResult<GatewayOrder> {
        let request = CreateOrderRequest {
            amount: amount * Decimal::from(100),
            currency: "INR",
            receipt: order_id.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/orders", self.endpoint))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("payment gateway error: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Internal(anyhow::anyhow!(
                "payment gateway returned {}",
                response.status()
            )));
        }

        response
            .json::<GatewayOrder>()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("payment gateway decode error: {e}")))
    }

    /// Verify a completed payment with the gateway.
    pub async fn verify_payment(&self, payment_id: &str) -> AppResult<PaymentVerification> {
        let response = self
            .client
            .get(format!("{}/payments/{}", self.endpoint, payment_id))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("payment gateway error: {e}")))?;

        #[derive(Deserialize)]
        struct PaymentResponse {
            id: String,
            status: String,
        }

        let payment = response
            .json::<PaymentResponse>()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("payment gateway decode error: {e}")))?;

        Ok(PaymentVerification {
            payment_id: payment.id,
            verified: payment.status == "captured",
        })
    }
}
