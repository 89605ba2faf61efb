//! In-process order store with the same semantics as the Postgres one

use std::collections::BTreeMap;

use async_trait::async_trait;
use shared::Order;
use tokio::sync::RwLock;

use super::{OrderStore, Page, StoreError, StoreResult};

#[derive(Default)]
struct Inner {
    next_id: i64,
    orders: BTreeMap<i64, Order>,
}

#[derive(Default)]
pub struct MemoryOrderStore {
    inner: RwLock<Inner>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn get(&self, id: i64) -> StoreResult<Order> {
        self.inner
            .read()
            .await
            .orders
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn list(
        &self,
        offset: i64,
        limit: i64,
        user_id: Option<&str>,
    ) -> StoreResult<Vec<Order>> {
        let page = Page::clamped(offset, limit);
        let inner = self.inner.read().await;

        Ok(inner
            .orders
            .values()
            .filter(|o| user_id.is_none_or(|u| o.user_id == u))
            .skip(usize::try_from(page.offset).unwrap_or(usize::MAX))
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn create(&self, order: Order) -> StoreResult<Order> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let order = Order {
            id: inner.next_id,
            ..order
        };
        inner.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn update(&self, order: Order) -> StoreResult<Order> {
        let mut inner = self.inner.write().await;
        match inner.orders.get_mut(&order.id) {
            Some(existing) => {
                *existing = order.clone();
                Ok(order)
            }
            None => Err(StoreError::NotFound(order.id)),
        }
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        self.inner.write().await.orders.remove(&id);
        Ok(())
    }
}
