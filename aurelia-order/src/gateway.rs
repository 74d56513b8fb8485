use async_trait::async_trait;
use aurelia_core::payment::{BillingDetails, CardDetails, PaymentGateway, PaymentOutcome};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::time::Duration;

/// Stand-in for an external payment gateway: waits a fixed latency, then
/// authorizes with a fixed success probability. Swappable behind
/// `PaymentGateway` so tests can force either outcome.
pub struct SimulatedGateway {
    success_rate: f64,
    latency: Duration,
}

impl SimulatedGateway {
    pub fn new(success_rate: f64, latency: Duration) -> Self {
        Self {
            success_rate,
            latency,
        }
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn authorize(
        &self,
        amount_cents: i64,
        currency: &str,
        _card: &CardDetails,
        _billing: &BillingDetails,
    ) -> Result<PaymentOutcome, Box<dyn std::error::Error + Send + Sync>> {
        tokio::time::sleep(self.latency).await;

        let approved = rand::thread_rng().gen::<f64>() < self.success_rate;
        tracing::debug!(amount_cents, currency, approved, "simulated authorization");

        if approved {
            Ok(PaymentOutcome::completed(
                generate_transaction_id(),
                "Payment processed successfully",
            ))
        } else {
            Ok(PaymentOutcome::failed("Payment declined"))
        }
    }
}

/// Opaque transaction reference, e.g. tr_k3j9x2m1q.
fn generate_transaction_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(char::from)
        .collect();
    format!("tr_{}", suffix.to_lowercase())
}

/// Deterministic gateway double returning a preset outcome.
pub struct FixedGateway {
    outcome: PaymentOutcome,
}

impl FixedGateway {
    pub fn completed() -> Self {
        Self {
            outcome: PaymentOutcome::completed(
                "tr_fixed0001".to_string(),
                "Payment processed successfully",
            ),
        }
    }

    pub fn declined() -> Self {
        Self {
            outcome: PaymentOutcome::failed("Payment declined"),
        }
    }
}

#[async_trait]
impl PaymentGateway for FixedGateway {
    async fn authorize(
        &self,
        _amount_cents: i64,
        _currency: &str,
        _card: &CardDetails,
        _billing: &BillingDetails,
    ) -> Result<PaymentOutcome, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.outcome.clone())
    }
}
