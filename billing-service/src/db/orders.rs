//! PostgreSQL order store
//!
//! Expects an `orders` table with columns matching [`Order`]
//! (`id BIGSERIAL PRIMARY KEY`, `paypal_id TEXT NULL`, ...).

use async_trait::async_trait;
use shared::Order;
use sqlx::PgPool;

use super::{OrderStore, Page, StoreError, StoreResult};

const COLUMNS: &str = "id, user_id, cluster_name, has_control_plane, monitoring_storage, \
                       image_storage, alerting, paypal_id";

#[derive(Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn get(&self, id: i64) -> StoreResult<Order> {
        sqlx::query_as::<_, Order>(&format!("SELECT {COLUMNS} FROM orders WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    async fn list(
        &self,
        offset: i64,
        limit: i64,
        user_id: Option<&str>,
    ) -> StoreResult<Vec<Order>> {
        let page = Page::clamped(offset, limit);

        let orders = match user_id {
            Some(user_id) => {
                sqlx::query_as::<_, Order>(&format!(
                    "SELECT {COLUMNS} FROM orders WHERE user_id = $1 \
                     ORDER BY id LIMIT $2 OFFSET $3"
                ))
                .bind(user_id)
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Order>(&format!(
                    "SELECT {COLUMNS} FROM orders ORDER BY id LIMIT $1 OFFSET $2"
                ))
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(orders)
    }

    async fn create(&self, order: Order) -> StoreResult<Order> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO orders (user_id, cluster_name, has_control_plane, monitoring_storage, \
             image_storage, alerting, paypal_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
        )
        .bind(&order.user_id)
        .bind(&order.cluster_name)
        .bind(order.has_control_plane)
        .bind(order.monitoring_storage)
        .bind(order.image_storage)
        .bind(order.alerting)
        .bind(&order.correlation_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Order { id, ..order })
    }

    async fn update(&self, order: Order) -> StoreResult<Order> {
        let result = sqlx::query(
            "UPDATE orders SET user_id = $1, cluster_name = $2, has_control_plane = $3,
             monitoring_storage = $4, image_storage = $5, alerting = $6, paypal_id = $7
             WHERE id = $8",
        )
        .bind(&order.user_id)
        .bind(&order.cluster_name)
        .bind(order.has_control_plane)
        .bind(order.monitoring_storage)
        .bind(order.image_storage)
        .bind(order.alerting)
        .bind(&order.correlation_id)
        .bind(order.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(order.id));
        }
        Ok(order)
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
