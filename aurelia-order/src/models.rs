use aurelia_core::payment::PaymentStatus;
use aurelia_rates::zones::ShippingMethod;
use aurelia_shared::Address;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// The upstream flow never pinned down a full transition graph, so only
    /// terminality is enforced: nothing moves out of Delivered or Cancelled.
    pub fn can_transition_to(&self, _next: OrderStatus) -> bool {
        !self.is_terminal()
    }

    /// Customer-facing tracking copy per status.
    pub fn tracking_message(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Order received, payment pending",
            OrderStatus::Processing => "Order confirmed, preparing for shipment",
            OrderStatus::Shipped => "Package in transit from Newberg, OR",
            OrderStatus::Delivered => "Package delivered to destination",
            OrderStatus::Cancelled => "Order cancelled",
        }
    }
}

/// A cart line as submitted at checkout; snapshotted into the order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartItem {
    pub id: u64,
    pub name: String,
    pub price_cents: i64,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total_cents(&self) -> i64 {
        self.price_cents * self.quantity as i64
    }
}

/// Destination plus the shipping option the customer committed to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub address: Address,
    pub method: ShippingMethod,
    pub estimated_days: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderSummary {
    pub subtotal_cents: i64,
    pub shipping_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
}

impl OrderSummary {
    pub fn new(subtotal_cents: i64, shipping_cents: i64, tax_cents: i64) -> Self {
        Self {
            subtotal_cents,
            shipping_cents,
            tax_cents,
            total_cents: subtotal_cents + shipping_cents + tax_cents,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.total_cents == self.subtotal_cents + self.shipping_cents + self.tax_cents
    }
}

/// The single source of truth for a customer's purchase. Everything except
/// `status` and `payment_status` is immutable after creation; mutations go
/// through the ledger only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: String,
    pub items: Vec<CartItem>,
    pub shipping: ShippingDetails,
    pub summary: OrderSummary,
    pub status: OrderStatus,
    pub tracking_number: String,
    pub created_at: DateTime<Utc>,
    pub estimated_delivery: NaiveDate,
    pub payment_status: PaymentStatus,
}

/// Tracking projection served to order-status queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingInfo {
    pub status: OrderStatus,
    pub message: String,
    pub estimated_delivery: NaiveDate,
    pub tracking_number: String,
}
