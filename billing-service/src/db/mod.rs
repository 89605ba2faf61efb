//! Order persistence
//!
//! [`OrderStore`] is the seam the service talks to. [`PgOrderStore`] backs it
//! with PostgreSQL; [`MemoryOrderStore`] keeps everything in process.

pub mod memory;
pub mod orders;

pub use memory::MemoryOrderStore;
pub use orders::PgOrderStore;

use async_trait::async_trait;
use shared::Order;
use thiserror::Error;

/// Largest page `list` will return
pub const MAX_PAGE_SIZE: i64 = 10;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Order {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Offset/limit after clamping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: i64,
    pub limit: i64,
}

impl Page {
    /// Out-of-range input is corrected, never rejected: a limit outside
    /// `1..=10` becomes 10, a negative offset becomes 0.
    pub fn clamped(offset: i64, limit: i64) -> Self {
        let limit = if (1..=MAX_PAGE_SIZE).contains(&limit) {
            limit
        } else {
            MAX_PAGE_SIZE
        };
        Self {
            offset: offset.max(0),
            limit,
        }
    }
}

/// CRUD over persisted orders
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn get(&self, id: i64) -> StoreResult<Order>;

    /// Orders by ascending id, optionally only those owned by `user_id`.
    /// Implementations apply [`Page::clamped`] to `offset`/`limit`.
    async fn list(&self, offset: i64, limit: i64, user_id: Option<&str>)
    -> StoreResult<Vec<Order>>;

    /// Persist `order` under a freshly assigned id; the incoming id is ignored.
    async fn create(&self, order: Order) -> StoreResult<Order>;

    /// Full replace of the record with `order.id`.
    async fn update(&self, order: Order) -> StoreResult<Order>;

    async fn delete(&self, id: i64) -> StoreResult<()>;
}
