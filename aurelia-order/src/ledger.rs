use aurelia_core::payment::PaymentStatus;
use chrono::{Duration, Utc};
use rand::Rng;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{CartItem, Order, OrderStatus, OrderSummary, ShippingDetails, TrackingInfo};
use crate::repository::OrderRepository;

/// Carrier-style tracking number prefix.
const TRACKING_PREFIX: &str = "1Z999AA";

/// Manages order creation, lookup, and status transitions over an injected
/// repository.
pub struct OrderLedger {
    repo: Arc<dyn OrderRepository>,
    order_prefix: String,
}

impl OrderLedger {
    pub fn new(repo: Arc<dyn OrderRepository>, order_prefix: impl Into<String>) -> Self {
        Self {
            repo,
            order_prefix: order_prefix.into(),
        }
    }

    /// Create and persist a new order. Identifiers and the delivery
    /// estimate are derived here; the caller is responsible for the
    /// consistency of items and summary.
    pub async fn create_order(
        &self,
        customer_id: String,
        items: Vec<CartItem>,
        shipping: ShippingDetails,
        summary: OrderSummary,
        payment_status: PaymentStatus,
    ) -> Result<Order, LedgerError> {
        let now = Utc::now();
        let transit_days = max_transit_days(&shipping.estimated_days);

        let order = Order {
            id: Uuid::new_v4(),
            order_number: self.generate_order_number(),
            customer_id,
            items,
            shipping,
            summary,
            status: OrderStatus::Pending,
            tracking_number: generate_tracking_number(),
            created_at: now,
            estimated_delivery: (now + Duration::days(transit_days)).date_naive(),
            payment_status,
        };

        self.repo
            .insert(&order)
            .await
            .map_err(|e| LedgerError::Storage(e.to_string()))?;

        tracing::debug!(order_id = %order.id, order_number = %order.order_number, "order recorded");
        Ok(order)
    }

    pub async fn get_order(&self, id: Uuid) -> Result<Option<Order>, LedgerError> {
        self.repo
            .get(id)
            .await
            .map_err(|e| LedgerError::Storage(e.to_string()))
    }

    pub async fn list_orders(&self, customer_id: &str) -> Result<Vec<Order>, LedgerError> {
        let orders = self
            .repo
            .list()
            .await
            .map_err(|e| LedgerError::Storage(e.to_string()))?;
        Ok(orders
            .into_iter()
            .filter(|o| o.customer_id == customer_id)
            .collect())
    }

    /// Move an order to a new status. Delivered and Cancelled are terminal;
    /// updates out of them are rejected.
    pub async fn update_status(
        &self,
        id: Uuid,
        new_status: OrderStatus,
    ) -> Result<Order, LedgerError> {
        let order = self.get_order(id).await?.ok_or(LedgerError::NotFound(id))?;

        if !order.status.can_transition_to(new_status) {
            return Err(LedgerError::TerminalStatus {
                current: order.status,
            });
        }

        self.repo
            .update_status(id, new_status)
            .await
            .map_err(|e| LedgerError::Storage(e.to_string()))?
            .ok_or(LedgerError::NotFound(id))
    }

    /// Tracking projection: current status with its customer-facing message.
    pub async fn tracking(&self, id: Uuid) -> Result<Option<TrackingInfo>, LedgerError> {
        Ok(self.get_order(id).await?.map(|order| TrackingInfo {
            status: order.status,
            message: order.status.tracking_message().to_string(),
            estimated_delivery: order.estimated_delivery,
            tracking_number: order.tracking_number,
        }))
    }

    /// Format: <prefix>-YYYYMMDD-NNNN, e.g. AU-20240315-0042.
    fn generate_order_number(&self) -> String {
        let sequence: u32 = rand::thread_rng().gen_range(0..10_000);
        format!(
            "{}-{}-{:04}",
            self.order_prefix,
            Utc::now().format("%Y%m%d"),
            sequence
        )
    }
}

/// Carrier-style identifier, independent of the order id.
fn generate_tracking_number() -> String {
    let suffix: u64 = rand::thread_rng().gen_range(0..100_000_000_000);
    format!("{}{:011}", TRACKING_PREFIX, suffix)
}

/// Upper bound of an estimated-days range: "2-3" → 3, "7-10" → 10, "2" → 2.
fn max_transit_days(estimated_days: &str) -> i64 {
    estimated_days
        .split('-')
        .filter_map(|part| part.trim().parse::<i64>().ok())
        .max()
        .unwrap_or(0)
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Order not found: {0}")]
    NotFound(Uuid),

    #[error("Order is in terminal status {current:?} and cannot be updated")]
    TerminalStatus { current: OrderStatus },

    #[error("Order storage failed: {0}")]
    Storage(String),
}
