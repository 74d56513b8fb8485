use async_trait::async_trait;
use aurelia_rates::zones::ShippingMethod;
use aurelia_shared::Address;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::models::{CartItem, Order, OrderStatus, ShippingDetails};
use crate::repository::OrderRepository;

/// Minimal in-memory repository for unit tests within this crate. The real
/// store lives in aurelia-store, which depends on this crate.
#[derive(Default)]
pub(crate) struct TestOrderRepository {
    orders: Mutex<HashMap<Uuid, Order>>,
}

#[async_trait]
impl OrderRepository for TestOrderRepository {
    async fn insert(
        &self,
        order: &Order,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.orders
            .lock()
            .unwrap()
            .insert(order.id, order.clone());
        Ok(())
    }

    async fn get(
        &self,
        id: Uuid,
    ) -> Result<Option<Order>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.orders.lock().unwrap().get(&id).cloned())
    }

    async fn list(
        &self,
    ) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.orders.lock().unwrap().values().cloned().collect())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<Order>, Box<dyn std::error::Error + Send + Sync>> {
        let mut orders = self.orders.lock().unwrap();
        Ok(orders.get_mut(&id).map(|order| {
            order.status = status;
            order.clone()
        }))
    }
}

pub(crate) fn sample_items() -> Vec<CartItem> {
    vec![CartItem {
        id: 1,
        name: "Sapphire Pendant".to_string(),
        price_cents: 100_00,
        quantity: 1,
    }]
}

pub(crate) fn sample_shipping(estimated_days: &str) -> ShippingDetails {
    ShippingDetails {
        address: Address {
            street: "500 E First St".to_string(),
            city: "Newberg".to_string(),
            state: "OR".to_string(),
            zip_code: "97132".to_string(),
            country: "US".to_string(),
        },
        method: ShippingMethod::Ground,
        estimated_days: estimated_days.to_string(),
    }
}
