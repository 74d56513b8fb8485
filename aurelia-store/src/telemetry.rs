use aurelia_shared::models::events::{
    OrderPlacedEvent, OrderStatusChangedEvent, PaymentCapturedEvent,
};
use tracing::info;

/// Structured event log, the single sink for business telemetry. Events go
/// out under the "telemetry" target so subscribers can route them
/// separately from application logs.
#[derive(Clone, Default)]
pub struct Telemetry;

impl Telemetry {
    pub fn new() -> Self {
        Self
    }

    pub fn log_order_placed(&self, event: OrderPlacedEvent) {
        info!(
            target: "telemetry",
            order_id = %event.order_id,
            order_number = %event.order_number,
            customer_id = %event.customer_id,
            total_cents = event.total_cents,
            timestamp = event.timestamp,
            "order placed"
        );
    }

    pub fn log_payment_captured(&self, event: PaymentCapturedEvent) {
        info!(
            target: "telemetry",
            order_id = %event.order_id,
            transaction_id = %event.transaction_id,
            amount_cents = event.amount_cents,
            currency = %event.currency,
            timestamp = event.timestamp,
            "payment captured"
        );
    }

    pub fn log_status_changed(&self, event: OrderStatusChangedEvent) {
        info!(
            target: "telemetry",
            order_id = %event.order_id,
            from_status = %event.from_status,
            to_status = %event.to_status,
            timestamp = event.timestamp,
            "order status changed"
        );
    }
}
