//! Order operations
//!
//! `OrderService` owns its collaborators (store, reconciler, orchestrator);
//! nothing here reaches for global state.

use std::sync::Arc;

use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::{EnrichedOrder, Order};

use crate::db::OrderStore;
use crate::error::ServiceResult;
use crate::provisioning::Orchestrator;
use crate::reconcile::Reconciler;
use crate::validation::{self, OrderForm};

/// A page of orders, plain or joined with provider details
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Listing {
    Plain(Vec<Order>),
    Enriched(Vec<EnrichedOrder>),
}

impl Listing {
    pub fn len(&self) -> usize {
        match self {
            Listing::Plain(orders) => orders.len(),
            Listing::Enriched(orders) => orders.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct OrderService {
    store: Arc<dyn OrderStore>,
    reconciler: Reconciler,
    orchestrator: Arc<dyn Orchestrator>,
}

impl OrderService {
    pub fn new(
        store: Arc<dyn OrderStore>,
        reconciler: Reconciler,
        orchestrator: Arc<dyn Orchestrator>,
    ) -> Self {
        Self {
            store,
            reconciler,
            orchestrator,
        }
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Order> {
        tracing::debug!(order_id = id, "Fetching order");
        Ok(self.store.get(id).await?)
    }

    /// List a page; a non-blank `user_id` restricts it to that user and
    /// switches to the reconciled view.
    pub async fn list(&self, start: i64, count: i64, user_id: Option<&str>) -> ServiceResult<Listing> {
        match user_id.map(str::trim).filter(|u| !u.is_empty()) {
            Some(user_id) => {
                tracing::info!(user_id, "Listing orders with payment details");
                let orders = self.store.list(start, count, Some(user_id)).await?;
                let enriched = self.reconciler.reconcile(orders).await?;
                Ok(Listing::Enriched(enriched))
            }
            None => {
                tracing::info!("Listing orders");
                let orders = self.store.list(start, count, None).await?;
                Ok(Listing::Plain(orders))
            }
        }
    }

    /// Validate, persist, then notify the orchestrator
    ///
    /// A failed notification is reported to the caller but the order stays
    /// persisted.
    pub async fn create(&self, form: OrderForm) -> ServiceResult<Order> {
        validation::check(&form)?;

        let order = self.store.create(form.into_order(0)).await?;
        tracing::info!(
            order_id = order.id,
            user_id = %order.user_id,
            cluster_name = %order.cluster_name,
            has_control_plane = order.has_control_plane,
            monitoring_storage = order.monitoring_storage,
            image_storage = order.image_storage,
            alerting = order.alerting,
            "Order created"
        );

        if let Err(e) = self.orchestrator.order_created(&order).await {
            tracing::error!(order_id = order.id, error = %e, "Order persisted but provisioning was not notified");
            return Err(e.into());
        }

        Ok(order)
    }

    /// Full replace of order `id`
    pub async fn update(&self, id: i64, form: OrderForm) -> ServiceResult<Order> {
        validation::check(&form)?;

        let order = self.store.update(form.into_order(id)).await?;
        tracing::info!(
            order_id = order.id,
            user_id = %order.user_id,
            cluster_name = %order.cluster_name,
            "Order updated"
        );
        Ok(order)
    }

    /// Delete order `id` if it can be fetched right now
    ///
    /// Any failure of that check (including absence) refuses the delete.
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        if let Err(e) = self.store.get(id).await {
            tracing::error!(order_id = id, error = %e, "Unexpected order to delete");
            return Err(AppError::with_message(
                ErrorCode::OrderDeleteUnconfirmed,
                format!("Unexpected order ({id}) to delete"),
            )
            .into());
        }

        self.store.delete(id).await?;
        tracing::info!(order_id = id, "Order deleted");
        Ok(())
    }
}
