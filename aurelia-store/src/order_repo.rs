use async_trait::async_trait;
use aurelia_order::models::{Order, OrderStatus};
use aurelia_order::repository::OrderRepository;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory order store. The RwLock serializes access so concurrent
/// request handlers see last-write-wins per key; contents reset on restart
/// by design.
#[derive(Default)]
pub struct MemoryOrderRepository {
    orders: RwLock<HashMap<Uuid, Order>>,
}

impl MemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn insert(
        &self,
        order: &Order,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.orders
            .write()
            .await
            .insert(order.id, order.clone());
        Ok(())
    }

    async fn get(
        &self,
        id: Uuid,
    ) -> Result<Option<Order>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn list(
        &self,
    ) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>> {
        let orders = self.orders.read().await;
        let mut all: Vec<Order> = orders.values().cloned().collect();
        all.sort_by_key(|o| o.created_at);
        Ok(all)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<Order>, Box<dyn std::error::Error + Send + Sync>> {
        let mut orders = self.orders.write().await;
        Ok(orders.get_mut(&id).map(|order| {
            order.status = status;
            order.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurelia_core::payment::PaymentStatus;
    use aurelia_order::models::{CartItem, OrderSummary, ShippingDetails};
    use aurelia_rates::zones::ShippingMethod;
    use aurelia_shared::Address;
    use chrono::Utc;

    fn order(customer: &str) -> Order {
        Order {
            id: Uuid::new_v4(),
            order_number: "AU-20240315-0042".to_string(),
            customer_id: customer.to_string(),
            items: vec![CartItem {
                id: 1,
                name: "Pearl Earrings".to_string(),
                price_cents: 60_00,
                quantity: 1,
            }],
            shipping: ShippingDetails {
                address: Address {
                    street: "500 E First St".to_string(),
                    city: "Newberg".to_string(),
                    state: "OR".to_string(),
                    zip_code: "97132".to_string(),
                    country: "US".to_string(),
                },
                method: ShippingMethod::Ground,
                estimated_days: "2-3".to_string(),
            },
            summary: OrderSummary::new(60_00, 15_00, 0),
            status: OrderStatus::Pending,
            tracking_number: "1Z999AA00000000001".to_string(),
            created_at: Utc::now(),
            estimated_delivery: Utc::now().date_naive(),
            payment_status: PaymentStatus::Completed,
        }
    }

    #[tokio::test]
    async fn insert_then_get_round_trips() {
        let repo = MemoryOrderRepository::new();
        let order = order("cust-1");
        repo.insert(&order).await.unwrap();

        let found = repo.get(order.id).await.unwrap().unwrap();
        assert_eq!(found.order_number, order.order_number);
    }

    #[tokio::test]
    async fn get_unknown_id_is_none() {
        let repo = MemoryOrderRepository::new();
        assert!(repo.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_status_mutates_in_place() {
        let repo = MemoryOrderRepository::new();
        let order = order("cust-1");
        repo.insert(&order).await.unwrap();

        let updated = repo
            .update_status(order.id, OrderStatus::Shipped)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Shipped);

        let missing = repo
            .update_status(Uuid::new_v4(), OrderStatus::Shipped)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn list_returns_all_orders() {
        let repo = MemoryOrderRepository::new();
        repo.insert(&order("cust-1")).await.unwrap();
        repo.insert(&order("cust-2")).await.unwrap();
        assert_eq!(repo.list().await.unwrap().len(), 2);
    }
}
