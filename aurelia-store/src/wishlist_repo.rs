use async_trait::async_trait;
use aurelia_core::repository::WishlistRepository;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::RwLock;

/// Per-customer saved product ids.
#[derive(Default)]
pub struct MemoryWishlistRepository {
    items: RwLock<HashMap<String, BTreeSet<u64>>>,
}

impl MemoryWishlistRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WishlistRepository for MemoryWishlistRepository {
    async fn add(
        &self,
        customer_id: &str,
        product_id: u64,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let mut items = self.items.write().await;
        Ok(items
            .entry(customer_id.to_string())
            .or_default()
            .insert(product_id))
    }

    async fn remove(
        &self,
        customer_id: &str,
        product_id: u64,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let mut items = self.items.write().await;
        Ok(items
            .get_mut(customer_id)
            .map(|set| set.remove(&product_id))
            .unwrap_or(false))
    }

    async fn list(
        &self,
        customer_id: &str,
    ) -> Result<Vec<u64>, Box<dyn std::error::Error + Send + Sync>> {
        let items = self.items.read().await;
        Ok(items
            .get(customer_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default())
    }
}
