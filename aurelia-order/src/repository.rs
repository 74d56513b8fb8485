use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Order, OrderStatus};

/// Repository trait for order data access. The checkout core only ever
/// talks to this seam; the in-memory store lives in `aurelia-store` and a
/// persistent one could be substituted without touching calculation logic.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert(
        &self,
        order: &Order,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn get(
        &self,
        id: Uuid,
    ) -> Result<Option<Order>, Box<dyn std::error::Error + Send + Sync>>;

    async fn list(
        &self,
    ) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>>;

    /// Returns the updated order, or None if the id is unknown.
    async fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<Order>, Box<dyn std::error::Error + Send + Sync>>;
}
